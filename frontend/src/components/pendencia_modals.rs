//! 待办的完成 / 编辑 / 删除对话框

use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::photo::{read_data_url, selected_file};
use cn19::shared::protocol::{DeletePendenciaRequest, EditPendenciaRequest, FinalizePendenciaRequest};
use cn19::shared::{FormConfig, Pendencia, Tipo};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn modal_class(open: bool) -> &'static str {
    if open { "modal modal-open" } else { "modal" }
}

/// 照片选择框，读取完成后写入 `set_photo`
#[component]
pub fn PhotoInput(
    #[prop(into)] label: String,
    photo: ReadSignal<Option<String>>,
    set_photo: WriteSignal<Option<String>>,
) -> impl IntoView {
    let (reading, set_reading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_change = move |ev: leptos::ev::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_reading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match read_data_url(&file).await {
                Ok(url) => set_photo.set(Some(url)),
                Err(e) => {
                    tracing::warn!(error = %e, "photo read failed");
                    set_error.set(Some("Não foi possível ler a foto".to_string()));
                }
            }
            set_reading.set(false);
        });
    };

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text flex items-center gap-2"><Camera attr:class="h-4 w-4" />{label}</span>
            </label>
            <input type="file" accept="image/*" class="file-input file-input-bordered w-full" on:change=on_change />
            <Show when=move || reading.get()>
                <span class="loading loading-dots loading-sm mt-2"></span>
            </Show>
            <Show when=move || error.with(Option::is_some)>
                <span class="text-error text-sm mt-1">{move || error.get().unwrap_or_default()}</span>
            </Show>
            <Show when=move || photo.with(Option::is_some)>
                <img class="mt-2 rounded-box max-h-48 object-contain" src=move || photo.get().unwrap_or_default() />
            </Show>
        </div>
    }
}

// =========================================================
// 完成
// =========================================================

#[component]
pub fn FinalizeModal(
    target: ReadSignal<Option<Pendencia>>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_done: Callback<Pendencia>,
) -> impl IntoView {
    let auth = use_auth();
    let (notes, set_notes) = signal(String::new());
    let (photo, set_photo) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    // 每次打开都重置表单
    Effect::new(move |_| {
        if target.with(Option::is_some) {
            set_notes.set(String::new());
            set_photo.set(None);
            set_error.set(None);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(p) = target.get() else { return };
        let req = FinalizePendenciaRequest::new(p.id, notes.get(), photo.get().unwrap_or_default());
        let req = match req.normalized() {
            Ok(req) => req,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            match call(&auth, req).await {
                Ok(updated) => on_done.run(updated),
                Err(e) => set_error.set(Some(e.detail_or("Erro ao finalizar pendência").to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class=move || modal_class(target.with(Option::is_some))>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Finalizar pendência"</h3>
                <p class="py-2 text-base-content/70">
                    {move || target.with(|t| t.as_ref().map(|p| format!("{} · {}", p.site, p.subtipo)).unwrap_or_default())}
                </p>
                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Informações de fechamento"</span></label>
                        <textarea
                            class="textarea textarea-bordered h-24"
                            on:input=move |ev| set_notes.set(event_target_value(&ev))
                            prop:value=notes
                        ></textarea>
                    </div>
                    <PhotoInput label="Foto de fechamento" photo=photo set_photo=set_photo />
                    <Show when=move || error.with(Option::is_some)>
                        <div class="alert alert-error text-sm py-2"><span>{move || error.get().unwrap_or_default()}</span></div>
                    </Show>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>"Cancelar"</button>
                        <button type="submit" class="btn btn-success gap-2" disabled=move || saving.get()>
                            <CheckCircle attr:class="h-4 w-4" /> "Finalizar"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

// =========================================================
// 编辑
// =========================================================

#[component]
pub fn EditModal(
    target: ReadSignal<Option<Pendencia>>,
    form_config: ReadSignal<FormConfig>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_done: Callback<Pendencia>,
) -> impl IntoView {
    let auth = use_auth();
    let (site, set_site) = signal(String::new());
    let (ami, set_ami) = signal(String::new());
    let (tipo, set_tipo) = signal(Tipo::Energia);
    let (subtipo, set_subtipo) = signal(String::new());
    let (observacoes, set_observacoes) = signal(String::new());
    let (photo, set_photo) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    Effect::new(move |_| {
        if let Some(p) = target.get() {
            set_site.set(p.site.clone());
            set_ami.set(p.ami.clone().unwrap_or_default());
            set_tipo.set(p.tipo);
            set_subtipo.set(p.subtipo.clone());
            set_observacoes.set(p.observacoes.clone());
            set_photo.set(p.foto_base64.clone());
            set_error.set(None);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(p) = target.get() else { return };
        let mut req = EditPendenciaRequest::from_pendencia(&p);
        req.site = site.get();
        req.ami = Some(ami.get());
        req.tipo = tipo.get();
        req.subtipo = subtipo.get();
        req.observacoes = observacoes.get();
        req.foto_base64 = photo.get();
        let req = match req.normalized() {
            Ok(req) => req,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            match call(&auth, req).await {
                Ok(updated) => on_done.run(updated),
                Err(e) => set_error.set(Some(e.detail_or("Erro ao editar pendência").to_string())),
            }
            set_saving.set(false);
        });
    };

    let options = move || form_config.with(|c| c.options_for(tipo.get()).to_vec());

    view! {
        <div class=move || modal_class(target.with(Option::is_some))>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">"Editar pendência"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Site"</span></label>
                            <input type="text" class="input input-bordered" prop:value=site
                                on:input=move |ev| set_site.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"AMI (opcional)"</span></label>
                            <input type="text" class="input input-bordered" prop:value=ami
                                on:input=move |ev| set_ami.set(event_target_value(&ev)) />
                        </div>
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Tipo"</span></label>
                            <select class="select select-bordered" on:change=move |ev| {
                                if let Some(t) = Tipo::parse(&event_target_value(&ev)) {
                                    set_tipo.set(t);
                                    set_subtipo.set(String::new());
                                }
                            }>
                                {Tipo::ALL.into_iter().map(|t| view! {
                                    <option value=t.as_str() selected=move || tipo.get() == t>{t.as_str()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Subtipo"</span></label>
                            <select class="select select-bordered" on:change=move |ev| set_subtipo.set(event_target_value(&ev))>
                                <option value="" selected=move || subtipo.with(String::is_empty)>"Selecione"</option>
                                {move || options().into_iter().map(|o| {
                                    let value = o.clone();
                                    view! {
                                        <option value=o.clone() selected=move || subtipo.get() == value>{o}</option>
                                    }
                                }).collect_view()}
                            </select>
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Observações"</span></label>
                        <textarea class="textarea textarea-bordered h-24" prop:value=observacoes
                            on:input=move |ev| set_observacoes.set(event_target_value(&ev))></textarea>
                    </div>
                    <PhotoInput label="Substituir foto" photo=photo set_photo=set_photo />
                    <Show when=move || error.with(Option::is_some)>
                        <div class="alert alert-error text-sm py-2"><span>{move || error.get().unwrap_or_default()}</span></div>
                    </Show>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>"Cancelar"</button>
                        <button type="submit" class="btn btn-primary gap-2" disabled=move || saving.get()>
                            <Pencil attr:class="h-4 w-4" /> "Salvar"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

// =========================================================
// 删除
// =========================================================

#[component]
pub fn DeleteModal(
    target: ReadSignal<Option<Pendencia>>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_done: Callback<String>,
) -> impl IntoView {
    let auth = use_auth();
    let (deleting, set_deleting) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let on_confirm = move |_| {
        let Some(p) = target.get() else { return };
        set_deleting.set(true);
        set_error.set(None);
        spawn_local(async move {
            let id = p.id.clone();
            match call(&auth, DeletePendenciaRequest { id: p.id }).await {
                Ok(_) => on_done.run(id),
                Err(e) => set_error.set(Some(e.detail_or("Erro ao excluir pendência").to_string())),
            }
            set_deleting.set(false);
        });
    };

    view! {
        <div class=move || modal_class(target.with(Option::is_some))>
            <div class="modal-box">
                <h3 class="font-bold text-lg text-error">"Excluir pendência"</h3>
                <p class="py-4">
                    "Tem certeza que deseja excluir a pendência do site "
                    <span class="font-semibold">{move || target.with(|t| t.as_ref().map(|p| p.site.clone()).unwrap_or_default())}</span>
                    "? Esta ação não pode ser desfeita."
                </p>
                <Show when=move || error.with(Option::is_some)>
                    <div class="alert alert-error text-sm py-2"><span>{move || error.get().unwrap_or_default()}</span></div>
                </Show>
                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button class="btn btn-error gap-2" disabled=move || deleting.get() on:click=on_confirm>
                        <Trash2 attr:class="h-4 w-4" /> "Excluir"
                    </button>
                </div>
            </div>
        </div>
    }
}
