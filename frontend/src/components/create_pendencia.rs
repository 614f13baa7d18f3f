use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::AppShell;
use crate::components::notice::{Notifier, Toast};
use crate::components::pendencia_modals::PhotoInput;
use crate::web::router::use_router;
use cn19::AppRoute;
use cn19::shared::protocol::{CreatePendenciaRequest, GetFormConfigRequest, SitesRequest};
use cn19::shared::{FormConfig, Tipo};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CreatePendenciaPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = Notifier::new();

    let (form_config, set_form_config) = signal(FormConfig::default());
    let (known_sites, set_known_sites) = signal(Vec::<String>::new());

    let (site, set_site) = signal(String::new());
    let (ami, set_ami) = signal(String::new());
    let (tipo, set_tipo) = signal(Tipo::Energia);
    let (subtipo, set_subtipo) = signal(String::new());
    let (observacoes, set_observacoes) = signal(String::new());
    let (photo, set_photo) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    spawn_local(async move {
        match call(&auth, GetFormConfigRequest).await {
            Ok(config) => set_form_config.set(config),
            Err(e) => tracing::debug!(error = %e, "form config unavailable, using defaults"),
        }
        if let Ok(resp) = call(&auth, SitesRequest).await {
            set_known_sites.set(resp.sites);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = CreatePendenciaRequest {
            site: site.get(),
            ami: Some(ami.get()),
            tipo: tipo.get(),
            subtipo: subtipo.get(),
            observacoes: observacoes.get(),
            foto_base64: photo.get().unwrap_or_default(),
        };
        let req = match req.normalized() {
            Ok(req) => req,
            Err(e) => {
                notifier.error(e.to_string());
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            match call(&auth, req).await {
                Ok(created) => {
                    tracing::info!(id = %created.id, site = %created.site, "pendencia created");
                    router.navigate(AppRoute::Dashboard.to_path());
                }
                Err(e) => notifier.api_error(&e, "Erro ao criar pendência"),
            }
            set_saving.set(false);
        });
    };

    let options = move || form_config.with(|c| c.options_for(tipo.get()).to_vec());

    view! {
        <AppShell>
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl max-w-3xl mx-auto">
                <form class="card-body space-y-2" on:submit=on_submit>
                    <h1 class="card-title text-2xl">"Nova pendência"</h1>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="site"><span class="label-text">"Site *"</span></label>
                            <input id="site" type="text" list="known-sites" class="input input-bordered"
                                prop:value=site on:input=move |ev| set_site.set(event_target_value(&ev)) />
                            <datalist id="known-sites">
                                {move || known_sites.get().into_iter().map(|s| view! { <option value=s></option> }).collect_view()}
                            </datalist>
                        </div>
                        <div class="form-control">
                            <label class="label" for="ami"><span class="label-text">"AMI"</span></label>
                            <input id="ami" type="text" class="input input-bordered"
                                prop:value=ami on:input=move |ev| set_ami.set(event_target_value(&ev)) />
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Tipo *"</span></label>
                        <div class="join">
                            {Tipo::ALL.into_iter().map(|t| view! {
                                <button type="button"
                                    class=move || if tipo.get() == t { "btn join-item btn-primary" } else { "btn join-item" }
                                    on:click=move |_| {
                                        set_tipo.set(t);
                                        set_subtipo.set(String::new());
                                    }>
                                    {t.as_str()}
                                </button>
                            }).collect_view()}
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Subtipo *"</span></label>
                        <select class="select select-bordered" on:change=move |ev| set_subtipo.set(event_target_value(&ev))>
                            <option value="" selected=move || subtipo.with(String::is_empty)>"Selecione o subtipo"</option>
                            {move || options().into_iter().map(|o| {
                                let value = o.clone();
                                view! { <option value=o.clone() selected=move || subtipo.get() == value>{o}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form-control">
                        <label class="label" for="obs"><span class="label-text">"Observações *"</span></label>
                        <textarea id="obs" class="textarea textarea-bordered h-28"
                            prop:value=observacoes on:input=move |ev| set_observacoes.set(event_target_value(&ev))></textarea>
                    </div>
                    <PhotoInput label="Foto *" photo=photo set_photo=set_photo />
                    <div class="card-actions justify-end pt-4">
                        <button type="button" class="btn btn-ghost" on:click=move |_| router.navigate(AppRoute::Dashboard.to_path())>
                            "Cancelar"
                        </button>
                        <button type="submit" class="btn btn-primary gap-2" disabled=move || saving.get()>
                            <Plus attr:class="h-4 w-4" />
                            {move || if saving.get() { "Salvando..." } else { "Criar pendência" }}
                        </button>
                    </div>
                </form>
            </div>
        </AppShell>
    }
}
