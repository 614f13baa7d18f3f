//! 管理面板：用户审批、待办审核、表单目录、KML 导入、月度统计

use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, Spinner};
use crate::components::notice::{Notifier, Toast};
use crate::photo::{read_bytes, reset_input, selected_file};
use cn19::shared::protocol::{
    AdminDeletePendenciaRequest, AdminPendenciasRequest, AllUsersRequest, ApproveUserRequest,
    DeleteKmlRequest, DeleteUserRequest, GetFormConfigRequest, KmlLocationsRequest,
    MonthlyStatsRequest, PendingUsersRequest, ResetPasswordRequest, UploadKmlRequest,
    ValidatePendenciaRequest,
};
use cn19::shared::validation::{validate_kml_filename, validate_new_password};
use cn19::shared::{
    ApprovalDecision, FormConfig, KmlLocation, KmlUploadResponse, MonthlyStats, Pendencia,
    PendingUser, Role, Tipo, UserStatus, UserSummary,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Users,
    Validation,
    FormConfig,
    Kml,
    Stats,
}

impl AdminTab {
    const ALL: [AdminTab; 5] = [
        AdminTab::Users,
        AdminTab::Validation,
        AdminTab::FormConfig,
        AdminTab::Kml,
        AdminTab::Stats,
    ];

    fn label(&self) -> &'static str {
        match self {
            AdminTab::Users => "Usuários",
            AdminTab::Validation => "Validação",
            AdminTab::FormConfig => "Formulário",
            AdminTab::Kml => "Gerenciar KML",
            AdminTab::Stats => "Estatísticas",
        }
    }
}

#[component]
pub fn AdminPanelPage() -> impl IntoView {
    let notifier = Notifier::new();
    let (tab, set_tab) = signal(AdminTab::Users);

    view! {
        <AppShell>
            <Toast notifier=notifier />
            <h1 class="text-2xl font-bold">"Painel administrativo"</h1>
            <div role="tablist" class="tabs tabs-boxed">
                {AdminTab::ALL.into_iter().map(|t| view! {
                    <a role="tab"
                        class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                        on:click=move |_| set_tab.set(t)>
                        {t.label()}
                    </a>
                }).collect_view()}
            </div>
            {move || match tab.get() {
                AdminTab::Users => view! { <UsersTab notifier=notifier /> }.into_any(),
                AdminTab::Validation => view! { <ValidationTab notifier=notifier /> }.into_any(),
                AdminTab::FormConfig => view! { <FormConfigTab notifier=notifier /> }.into_any(),
                AdminTab::Kml => view! { <KmlTab notifier=notifier /> }.into_any(),
                AdminTab::Stats => view! { <StatsTab notifier=notifier /> }.into_any(),
            }}
        </AppShell>
    }
}

// =========================================================
// 用户
// =========================================================

#[component]
fn UsersTab(notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (pending, set_pending) = signal(Vec::<PendingUser>::new());
    let (users, set_users) = signal(Vec::<UserSummary>::new());
    let (loading, set_loading) = signal(true);
    let (reset_target, set_reset_target) = signal(Option::<UserSummary>::None);
    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());

    let reload = move || {
        set_loading.set(true);
        spawn_local(async move {
            match call(&auth, PendingUsersRequest).await {
                Ok(list) => set_pending.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar usuários pendentes"),
            }
            match call(&auth, AllUsersRequest).await {
                Ok(list) => set_users.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar usuários"),
            }
            set_loading.set(false);
        });
    };
    reload();

    let decide = move |user_id: String, status: ApprovalDecision| {
        spawn_local(async move {
            match call(&auth, ApproveUserRequest { user_id, status }).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    reload();
                }
                Err(e) => notifier.api_error(&e, "Erro ao atualizar usuário"),
            }
        });
    };

    let delete_user = move |user_id: String| {
        spawn_local(async move {
            match call(&auth, DeleteUserRequest { user_id: user_id.clone() }).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_users.update(|list| list.retain(|u| u.id != user_id));
                }
                Err(e) => notifier.api_error(&e, "Erro ao excluir usuário"),
            }
        });
    };

    let submit_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = reset_target.get() else { return };
        let password = new_password.get();
        if let Err(e) = validate_new_password(&password, &confirm_password.get()) {
            notifier.error(e.to_string());
            return;
        }
        spawn_local(async move {
            let req = ResetPasswordRequest {
                user_id: user.id.clone(),
                new_password: password,
            };
            match call(&auth, req).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_reset_target.set(None);
                    set_new_password.set(String::new());
                    set_confirm_password.set(String::new());
                }
                Err(e) => notifier.api_error(&e, "Erro ao redefinir senha"),
            }
        });
    };

    let me = move || auth.user().map(|u| u.id).unwrap_or_default();

    view! {
        <Show when=move || loading.get() && users.with(Vec::is_empty)>
            <Spinner />
        </Show>

        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title gap-2"><Clock attr:class="h-5 w-5 text-warning" /> "Aguardando aprovação"</h2>
                <Show when=move || pending.with(Vec::is_empty)>
                    <p class="text-base-content/50">"Nenhum cadastro pendente."</p>
                </Show>
                <For
                    each=move || pending.get()
                    key=|u| u.id.clone()
                    children=move |u| {
                        let approve_id = u.id.clone();
                        let reject_id = u.id.clone();
                        view! {
                            <div class="flex items-center justify-between border-b border-base-200 py-2">
                                <div>
                                    <p class="font-medium">{u.username.clone()}</p>
                                    <p class="text-xs text-base-content/60">
                                        {u.created_at.as_ref().map(|d| format!("Cadastrado em {}", d.display_date()))}
                                    </p>
                                </div>
                                <div class="flex gap-2">
                                    <button class="btn btn-success btn-sm gap-1" on:click=move |_| decide(approve_id.clone(), ApprovalDecision::Approved)>
                                        <CheckCircle attr:class="h-4 w-4" /> "Aprovar"
                                    </button>
                                    <button class="btn btn-error btn-sm gap-1" on:click=move |_| decide(reject_id.clone(), ApprovalDecision::Rejected)>
                                        <XCircle attr:class="h-4 w-4" /> "Rejeitar"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>

        <div class="card bg-base-100 shadow">
            <div class="card-body p-0">
                <h2 class="card-title gap-2 p-6 pb-2"><Users attr:class="h-5 w-5" /> "Todos os usuários"</h2>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Usuário"</th>
                                <th>"Perfil"</th>
                                <th>"Status"</th>
                                <th class="hidden md:table-cell">"Aprovado por"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || users.get()
                                key=|u| (u.id.clone(), u.status)
                                children=move |u| {
                                    let is_self = u.id == me();
                                    let delete_id = u.id.clone();
                                    let reset_user = u.clone();
                                    let status_class = match u.status {
                                        UserStatus::Approved => "badge badge-success",
                                        UserStatus::Pending => "badge badge-warning",
                                        UserStatus::Rejected => "badge badge-error",
                                    };
                                    view! {
                                        <tr>
                                            <td class="font-medium">{u.username.clone()}</td>
                                            <td>{if u.role == Role::Admin { "Admin" } else { "Usuário" }}</td>
                                            <td><span class=status_class>{u.status.label()}</span></td>
                                            <td class="hidden md:table-cell text-sm opacity-70">{u.approved_by.clone()}</td>
                                            <td class="flex gap-1 justify-end">
                                                <button class="btn btn-ghost btn-sm" title="Redefinir senha"
                                                    on:click=move |_| set_reset_target.set(Some(reset_user.clone()))>
                                                    <Key attr:class="h-4 w-4" />
                                                </button>
                                                <Show when=move || !is_self>
                                                    {
                                                        let id = delete_id.clone();
                                                        view! {
                                                            <button class="btn btn-ghost btn-sm text-error" title="Excluir"
                                                                on:click=move |_| delete_user(id.clone())>
                                                                <Trash2 attr:class="h-4 w-4" />
                                                            </button>
                                                        }
                                                    }
                                                </Show>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>

        <div class=move || if reset_target.with(Option::is_some) { "modal modal-open" } else { "modal" }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    "Redefinir senha de " {move || reset_target.with(|u| u.as_ref().map(|u| u.username.clone()).unwrap_or_default())}
                </h3>
                <form class="space-y-4 mt-4" on:submit=submit_reset>
                    <input type="password" class="input input-bordered w-full" placeholder="Nova senha"
                        prop:value=new_password on:input=move |ev| set_new_password.set(event_target_value(&ev)) />
                    <input type="password" class="input input-bordered w-full" placeholder="Confirmar nova senha"
                        prop:value=confirm_password on:input=move |ev| set_confirm_password.set(event_target_value(&ev)) />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_reset_target.set(None)>"Cancelar"</button>
                        <button type="submit" class="btn btn-primary">"Redefinir"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}

// =========================================================
// 待办审核
// =========================================================

#[component]
fn ValidationTab(notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (items, set_items) = signal(Vec::<Pendencia>::new());
    let (loading, set_loading) = signal(true);
    let (show_all, set_show_all) = signal(false);
    let (notes, set_notes) = signal(std::collections::HashMap::<String, String>::new());

    let reload = move || {
        set_loading.set(true);
        spawn_local(async move {
            match call(&auth, AdminPendenciasRequest).await {
                Ok(list) => set_items.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar pendências"),
            }
            set_loading.set(false);
        });
    };
    reload();

    let validate = move |id: String, status: ApprovalDecision| {
        let validation_notes = notes
            .with_untracked(|n| n.get(&id).cloned())
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        spawn_local(async move {
            let req = ValidatePendenciaRequest {
                id,
                status,
                validation_notes,
            };
            match call(&auth, req).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    reload();
                }
                Err(e) => notifier.api_error(&e, "Erro ao validar pendência"),
            }
        });
    };

    let remove = move |id: String| {
        spawn_local(async move {
            match call(&auth, AdminDeletePendenciaRequest { id: id.clone() }).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_items.update(|list| list.retain(|p| p.id != id));
                }
                Err(e) => notifier.api_error(&e, "Erro ao excluir pendência"),
            }
        });
    };

    let visible = move || {
        let all = show_all.get();
        items.with(|list| {
            list.iter()
                .filter(|p| all || p.awaiting_validation())
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="flex items-center justify-between">
            <label class="label cursor-pointer gap-2">
                <input type="checkbox" class="toggle toggle-sm" prop:checked=show_all
                    on:change=move |ev| set_show_all.set(event_target_checked(&ev)) />
                <span class="label-text">"Mostrar todas"</span>
            </label>
            <button class="btn btn-ghost btn-circle" on:click=move |_| reload() disabled=move || loading.get()>
                <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
            </button>
        </div>
        <Show when=move || !loading.get() && visible().is_empty()>
            <p class="text-center py-8 text-base-content/50">"Nenhuma pendência aguardando validação."</p>
        </Show>
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
            <For
                each=visible
                key=|p| (p.id.clone(), p.status, p.validation_status)
                children=move |p| {
                    let awaiting = p.awaiting_validation();
                    let id_notes = p.id.clone();
                    let id_ok = p.id.clone();
                    let id_no = p.id.clone();
                    let id_del = p.id.clone();
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-4 gap-2">
                                <div class="flex justify-between">
                                    <h3 class="font-semibold">{p.site.clone()} " · " {p.subtipo.clone()}</h3>
                                    <span class="badge">{p.status.as_str()}</span>
                                </div>
                                <p class="text-sm">{p.observacoes.clone()}</p>
                                <p class="text-xs opacity-60">
                                    {format!("Criada por {} · Finalizada por {}", p.usuario_criacao, p.usuario_finalizacao.clone().unwrap_or_else(|| "-".into()))}
                                </p>
                                {p.informacoes_fechamento.clone().map(|info| view! { <div class="bg-base-200 rounded p-2 text-sm">{info}</div> })}
                                <div class="flex gap-2">
                                    {p.foto_base64.clone().map(|src| view! { <img src=src class="rounded h-24 object-cover" /> })}
                                    {p.foto_fechamento_base64.clone().map(|src| view! { <img src=src class="rounded h-24 object-cover" /> })}
                                </div>
                                <Show when=move || awaiting>
                                    {
                                        let id_notes = id_notes.clone();
                                        let id_ok = id_ok.clone();
                                        let id_no = id_no.clone();
                                        view! {
                                            <input type="text" class="input input-bordered input-sm" placeholder="Observação da validação (opcional)"
                                                on:input=move |ev| {
                                                    let value = event_target_value(&ev);
                                                    let key = id_notes.clone();
                                                    set_notes.update(|n| { n.insert(key, value); });
                                                } />
                                            <div class="card-actions justify-end">
                                                <button class="btn btn-success btn-sm" on:click=move |_| validate(id_ok.clone(), ApprovalDecision::Approved)>"Aprovar"</button>
                                                <button class="btn btn-warning btn-sm" on:click=move |_| validate(id_no.clone(), ApprovalDecision::Rejected)>"Reprovar"</button>
                                            </div>
                                        }
                                    }
                                </Show>
                                <div class="card-actions justify-end">
                                    <button class="btn btn-ghost btn-xs text-error gap-1" on:click=move |_| remove(id_del.clone())>
                                        <Trash2 attr:class="h-3 w-3" /> "Excluir"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

// =========================================================
// 表单目录
// =========================================================

#[component]
fn FormConfigTab(notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (config, set_config) = signal(FormConfig::default());
    let (new_energia, set_new_energia) = signal(String::new());
    let (new_arcon, set_new_arcon) = signal(String::new());
    let (saving, set_saving) = signal(false);

    spawn_local(async move {
        match call(&auth, GetFormConfigRequest).await {
            Ok(c) => set_config.set(c),
            Err(e) => notifier.api_error(&e, "Erro ao carregar configuração"),
        }
    });

    let add = move |tipo: Tipo| {
        let (value, clear) = match tipo {
            Tipo::Energia => (new_energia.get(), set_new_energia),
            Tipo::Arcon => (new_arcon.get(), set_new_arcon),
        };
        let mut added = false;
        set_config.update(|c| added = c.add_option(tipo, &value));
        if added {
            clear.set(String::new());
        } else {
            notifier.error("Opção vazia ou já existente");
        }
    };

    let save = move |_| {
        let body = config.get();
        set_saving.set(true);
        spawn_local(async move {
            match call(&auth, body).await {
                Ok(resp) => notifier.success(resp.message),
                Err(e) => notifier.api_error(&e, "Erro ao salvar configuração"),
            }
            set_saving.set(false);
        });
    };

    let column = move |tipo: Tipo, input: ReadSignal<String>, set_input: WriteSignal<String>| {
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h3 class="card-title">{tipo.as_str()}</h3>
                    <ul class="space-y-1">
                        {move || config.with(|c| c.options_for(tipo).to_vec()).into_iter().map(|opt| {
                            let name = opt.clone();
                            view! {
                                <li class="flex items-center justify-between bg-base-200 rounded px-2 py-1">
                                    <span>{opt}</span>
                                    <button class="btn btn-ghost btn-xs text-error"
                                        on:click=move |_| set_config.update(|c| c.remove_option(tipo, &name))>
                                        <Trash2 attr:class="h-3 w-3" />
                                    </button>
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                    <div class="join w-full mt-2">
                        <input type="text" class="input input-bordered input-sm join-item grow" placeholder="Nova opção"
                            prop:value=input on:input=move |ev| set_input.set(event_target_value(&ev)) />
                        <button class="btn btn-sm btn-primary join-item" on:click=move |_| add(tipo)>
                            <Plus attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        }
    };

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            {column(Tipo::Energia, new_energia, set_new_energia)}
            {column(Tipo::Arcon, new_arcon, set_new_arcon)}
        </div>
        <div class="flex justify-end">
            <button class="btn btn-primary" on:click=save disabled=move || saving.get()>"Salvar configuração"</button>
        </div>
    }
}

// =========================================================
// KML
// =========================================================

#[component]
fn KmlTab(notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (locations, set_locations) = signal(Vec::<KmlLocation>::new());
    let (file_name, set_file_name) = signal(Option::<String>::None);
    let (file_bytes, set_file_bytes) = signal(Option::<Vec<u8>>::None);
    let (uploading, set_uploading) = signal(false);
    let (last_upload, set_last_upload) = signal(Option::<KmlUploadResponse>::None);

    let reload = move || {
        spawn_local(async move {
            match call(&auth, KmlLocationsRequest).await {
                Ok(list) => set_locations.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar localizações"),
            }
        });
    };
    reload();

    let on_file = move |ev: leptos::ev::Event| {
        let Some(file) = selected_file(&ev) else { return };
        let name = file.name();
        if let Err(e) = validate_kml_filename(&name) {
            notifier.error(e.to_string());
            reset_input(&ev);
            return;
        }
        spawn_local(async move {
            match read_bytes(&file).await {
                Ok(bytes) => {
                    set_file_name.set(Some(name));
                    set_file_bytes.set(Some(bytes));
                }
                Err(e) => notifier.error(format!("Não foi possível ler o arquivo: {}", e)),
            }
        });
    };

    let upload = move |_| {
        let (Some(filename), Some(bytes)) = (file_name.get(), file_bytes.get()) else {
            notifier.error("Selecione um arquivo KML para enviar");
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            match call(&auth, UploadKmlRequest { filename, bytes }).await {
                Ok(resp) => {
                    notifier.success(format!("{} ({} localizações)", resp.message, resp.total_locations));
                    set_last_upload.set(Some(resp));
                    set_file_name.set(None);
                    set_file_bytes.set(None);
                    reload();
                }
                Err(e) => notifier.api_error(&e, "Erro ao processar arquivo KML"),
            }
            set_uploading.set(false);
        });
    };

    let undo_upload = move |_| {
        let Some(upload) = last_upload.get() else { return };
        spawn_local(async move {
            match call(&auth, DeleteKmlRequest { kml_id: upload.kml_id }).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_last_upload.set(None);
                    reload();
                }
                Err(e) => notifier.api_error(&e, "Erro ao remover importação"),
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title gap-2"><Upload attr:class="h-5 w-5" /> "Importar arquivo KML"</h2>
                <div class="flex flex-wrap gap-2 items-center">
                    <input type="file" accept=".kml" class="file-input file-input-bordered" on:change=on_file />
                    <button class="btn btn-primary gap-2" on:click=upload
                        disabled=move || uploading.get() || file_bytes.with(Option::is_none)>
                        {move || if uploading.get() { "Enviando..." } else { "Enviar KML" }}
                    </button>
                </div>
                <Show when=move || file_name.with(Option::is_some)>
                    <p class="text-sm">"Arquivo selecionado: " <span class="font-medium">{move || file_name.get().unwrap_or_default()}</span></p>
                </Show>
                <Show when=move || last_upload.with(Option::is_some)>
                    <div class="alert alert-success text-sm">
                        <span>{move || last_upload.with(|u| u.as_ref().map(|u| format!("Importação {}: {} localizações", u.kml_id, u.total_locations)).unwrap_or_default())}</span>
                        <button class="btn btn-sm btn-ghost" on:click=undo_upload>"Desfazer importação"</button>
                    </div>
                </Show>
            </div>
        </div>

        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Localizações importadas (" {move || locations.with(Vec::len)} ")"</h2>
                <div class="overflow-x-auto max-h-96">
                    <table class="table table-sm">
                        <thead><tr><th>"Nome"</th><th>"Coordenadas"</th><th>"Arquivo"</th></tr></thead>
                        <tbody>
                            {move || locations.get().into_iter().map(|loc| view! {
                                <tr>
                                    <td>{loc.display_name().to_string()}</td>
                                    <td class="font-mono text-xs">
                                        {match (loc.latitude, loc.longitude) {
                                            (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
                                            _ => "-".to_string(),
                                        }}
                                    </td>
                                    <td class="text-xs opacity-70">{loc.source_file.clone()}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 月度统计
// =========================================================

#[component]
fn StatsTab(notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (stats, set_stats) = signal(Option::<MonthlyStats>::None);

    spawn_local(async move {
        match call(&auth, MonthlyStatsRequest).await {
            Ok(s) => set_stats.set(Some(s)),
            Err(e) => notifier.api_error(&e, "Erro ao carregar estatísticas"),
        }
    });

    view! {
        {move || match stats.get() {
            None => view! { <Spinner /> }.into_any(),
            Some(s) => {
                let leader = |l: Option<cn19::shared::MonthlyLeader>| {
                    l.map(|l| format!("{} ({})", l.username.unwrap_or_else(|| "-".into()), l.count))
                        .unwrap_or_else(|| "Sem registros".to_string())
                };
                view! {
                    <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                        <div class="stat">
                            <div class="stat-title">"Mês"</div>
                            <div class="stat-value text-2xl">{format!("{} {}", s.month, s.year)}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Mais pendências criadas"</div>
                            <div class="stat-value text-primary text-2xl">{leader(s.most_created)}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Mais pendências finalizadas"</div>
                            <div class="stat-value text-success text-2xl">{leader(s.most_finished)}</div>
                        </div>
                    </div>
                }
                .into_any()
            }
        }}
    }
}
