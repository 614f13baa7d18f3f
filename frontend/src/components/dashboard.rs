use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, Spinner};
use crate::components::notice::{Notifier, Toast};
use crate::components::pendencia_modals::{DeleteModal, EditModal, FinalizeModal};
use crate::web::router::use_router;
use cn19::{AppRoute, RequestSeq};
use cn19::shared::protocol::{GetFormConfigRequest, ListPendenciasRequest, SitesRequest};
use cn19::shared::{ApprovalDecision, FormConfig, Pendencia, PendenciaStatus, Tipo};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn status_badge(status: PendenciaStatus) -> &'static str {
    match status {
        PendenciaStatus::Pendente => "badge badge-warning",
        PendenciaStatus::Finalizado => "badge badge-info",
        PendenciaStatus::Validado => "badge badge-success",
        PendenciaStatus::Rejeitado => "badge badge-error",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = Notifier::new();

    let (pendencias, set_pendencias) = signal(Vec::<Pendencia>::new());
    let (sites, set_sites) = signal(Vec::<String>::new());
    let (form_config, set_form_config) = signal(FormConfig::default());
    let (loading, set_loading) = signal(true);

    // 过滤条件：前三项交给服务端，关键字在本地匹配
    let (site_filter, set_site_filter) = signal(String::new());
    let (tipo_filter, set_tipo_filter) = signal(Option::<Tipo>::None);
    let (status_filter, set_status_filter) = signal(Option::<PendenciaStatus>::None);
    let (search, set_search) = signal(String::new());

    let (finalizing, set_finalizing) = signal(Option::<Pendencia>::None);
    let (editing, set_editing) = signal(Option::<Pendencia>::None);
    let (deleting, set_deleting) = signal(Option::<Pendencia>::None);

    // 过滤条件快速变化时只接受最后一次请求的结果
    let seq = StoredValue::new(RequestSeq::default());

    let load_pendencias = move || {
        let mut ticket = 0;
        seq.update_value(|s| ticket = s.issue());
        let req = ListPendenciasRequest {
            site: Some(site_filter.get_untracked()).filter(|s| !s.is_empty()),
            tipo: tipo_filter.get_untracked(),
            status: status_filter.get_untracked(),
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = call(&auth, req).await;
            if !seq.with_value(|s| s.is_current(ticket)) {
                return;
            }
            match result {
                Ok(list) => set_pendencias.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar pendências"),
            }
            set_loading.set(false);
        });
    };

    // 初始加载 + 服务端过滤条件变化时重新加载
    Effect::new(move |_| {
        site_filter.track();
        tipo_filter.track();
        status_filter.track();
        load_pendencias();
    });

    spawn_local(async move {
        if let Ok(resp) = call(&auth, SitesRequest).await {
            set_sites.set(resp.sites);
        }
        // 配置接口不可用时沿用默认目录
        if let Ok(config) = call(&auth, GetFormConfigRequest).await {
            set_form_config.set(config);
        }
    });

    let visible = move || {
        let term = search.get();
        pendencias.with(|list| {
            list.iter()
                .filter(|p| p.matches(&term))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let count_by = move |status: PendenciaStatus| {
        pendencias.with(|list| list.iter().filter(|p| p.status == status).count())
    };

    let replace_item = move |updated: Pendencia| {
        set_pendencias.update(|list| {
            if let Some(slot) = list.iter_mut().find(|p| p.id == updated.id) {
                *slot = updated;
            }
        });
    };

    let on_finalized = Callback::new(move |updated: Pendencia| {
        set_finalizing.set(None);
        replace_item(updated);
        notifier.success("Pendência finalizada com sucesso");
    });
    let on_edited = Callback::new(move |updated: Pendencia| {
        set_editing.set(None);
        replace_item(updated);
        notifier.success("Pendência atualizada");
    });
    let on_deleted = Callback::new(move |id: String| {
        set_deleting.set(None);
        set_pendencias.update(|list| list.retain(|p| p.id != id));
        notifier.success("Pendência excluída");
    });

    view! {
        <AppShell>
            <Toast notifier=notifier />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold">"Pendências"</h1>
                    <p class="text-base-content/70 text-sm">
                        "Olá, " {move || auth.state.with(|s| s.user.as_ref().map(|u| u.username.clone()).unwrap_or_default())}
                    </p>
                </div>
                <div class="flex gap-2">
                    <button on:click=move |_| load_pendencias() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                    <button class="btn btn-primary gap-2" on:click=move |_| router.navigate(AppRoute::CreatePendencia.to_path())>
                        <Plus attr:class="h-4 w-4" /> "Nova pendência"
                    </button>
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Total"</div>
                    <div class="stat-value text-primary">{move || pendencias.with(Vec::len)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Pendentes"</div>
                    <div class="stat-value text-warning">{move || count_by(PendenciaStatus::Pendente)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Finalizadas"</div>
                    <div class="stat-value text-info">{move || count_by(PendenciaStatus::Finalizado)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Validadas"</div>
                    <div class="stat-value text-success">{move || count_by(PendenciaStatus::Validado)}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body grid grid-cols-1 md:grid-cols-4 gap-4">
                    <label class="input input-bordered flex items-center gap-2">
                        <Search attr:class="h-4 w-4 opacity-50" />
                        <input type="text" class="grow" placeholder="Buscar..."
                            prop:value=search on:input=move |ev| set_search.set(event_target_value(&ev)) />
                    </label>
                    <select class="select select-bordered" on:change=move |ev| set_site_filter.set(event_target_value(&ev))>
                        <option value="">"Todos os sites"</option>
                        {move || sites.get().into_iter().map(|s| view! { <option value=s.clone()>{s}</option> }).collect_view()}
                    </select>
                    <select class="select select-bordered" on:change=move |ev| set_tipo_filter.set(Tipo::parse(&event_target_value(&ev)))>
                        <option value="">"Todos os tipos"</option>
                        {Tipo::ALL.into_iter().map(|t| view! { <option value=t.as_str()>{t.as_str()}</option> }).collect_view()}
                    </select>
                    <select class="select select-bordered" on:change=move |ev| set_status_filter.set(PendenciaStatus::parse(&event_target_value(&ev)))>
                        <option value="">"Todos os status"</option>
                        {PendenciaStatus::ALL.into_iter().map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> }).collect_view()}
                    </select>
                </div>
            </div>

            <Show when=move || loading.get() && pendencias.with(Vec::is_empty)>
                <Spinner />
            </Show>
            <Show when=move || !loading.get() && visible().is_empty()>
                <div class="text-center py-12 text-base-content/50">"Nenhuma pendência encontrada."</div>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                <For
                    each=visible
                    key=|p| (p.id.clone(), p.status, p.observacoes.clone())
                    children=move |p| {
                        let for_finalize = p.clone();
                        let for_edit = p.clone();
                        let for_delete = p.clone();
                        let editable = p.is_editable();
                        let can_finalize = p.can_finalize();
                        view! {
                            <div class="card bg-base-100 shadow-md">
                                {p.foto_base64.clone().map(|src| view! {
                                    <figure class="max-h-48 overflow-hidden"><img src=src class="object-cover w-full" /></figure>
                                })}
                                <div class="card-body p-4 gap-2">
                                    <div class="flex items-center justify-between">
                                        <h2 class="card-title text-lg">{p.site.clone()}</h2>
                                        <span class=status_badge(p.status)>{p.status.as_str()}</span>
                                    </div>
                                    <div class="flex flex-wrap gap-2 text-sm">
                                        <span class="badge badge-outline">{p.tipo.as_str()}</span>
                                        <span class="badge badge-ghost">{p.subtipo.clone()}</span>
                                        {p.ami.clone().map(|ami| view! { <span class="badge badge-ghost">"AMI " {ami}</span> })}
                                    </div>
                                    <p class="text-sm">{p.observacoes.clone()}</p>
                                    <div class="text-xs text-base-content/60">
                                        {format!("Criada por {} em {}", p.usuario_criacao, p.data_hora.display_brasilia())}
                                    </div>
                                    {p.usuario_finalizacao.clone().map(|who| view! {
                                        <div class="text-xs text-base-content/60">
                                            {format!(
                                                "Finalizada por {}{}",
                                                who,
                                                p.data_finalizacao.as_ref().map(|d| format!(" em {}", d.display_brasilia())).unwrap_or_default()
                                            )}
                                        </div>
                                    })}
                                    {p.informacoes_fechamento.clone().map(|info| view! {
                                        <div class="bg-base-200 rounded p-2 text-sm">{info}</div>
                                    })}
                                    {p.foto_fechamento_base64.clone().map(|src| view! {
                                        <img src=src class="rounded max-h-32 object-cover" />
                                    })}
                                    {p.validation_status.map(|v| {
                                        let (class, label) = match v {
                                            ApprovalDecision::Approved => ("badge badge-success", "Validada"),
                                            ApprovalDecision::Rejected => ("badge badge-error", "Reprovada"),
                                        };
                                        view! {
                                            <div class="flex flex-wrap items-center gap-2 text-xs">
                                                <span class=class>{label}</span>
                                                {p.validation_notes.clone()}
                                            </div>
                                        }
                                    })}
                                    <div class="card-actions justify-end mt-2">
                                        <Show when=move || can_finalize>
                                            {
                                                let p = for_finalize.clone();
                                                view! {
                                                    <button class="btn btn-success btn-sm gap-1" on:click=move |_| set_finalizing.set(Some(p.clone()))>
                                                        <CheckCircle attr:class="h-4 w-4" /> "Finalizar"
                                                    </button>
                                                }
                                            }
                                        </Show>
                                        <Show when=move || editable>
                                            {
                                                let pe = for_edit.clone();
                                                let pd = for_delete.clone();
                                                view! {
                                                    <button class="btn btn-ghost btn-sm gap-1" on:click=move |_| set_editing.set(Some(pe.clone()))>
                                                        <Pencil attr:class="h-4 w-4" /> "Editar"
                                                    </button>
                                                    <button class="btn btn-ghost btn-sm text-error gap-1" on:click=move |_| set_deleting.set(Some(pd.clone()))>
                                                        <Trash2 attr:class="h-4 w-4" /> "Excluir"
                                                    </button>
                                                }
                                            }
                                        </Show>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>

            <FinalizeModal target=finalizing on_close=move |_| set_finalizing.set(None) on_done=on_finalized />
            <EditModal target=editing form_config=form_config on_close=move |_| set_editing.set(None) on_done=on_edited />
            <DeleteModal target=deleting on_close=move |_| set_deleting.set(None) on_done=on_deleted />
        </AppShell>
    }
}
