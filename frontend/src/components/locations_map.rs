//! 站点位置：KML 检索与位置备注

use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, Spinner};
use crate::components::notice::{Notifier, Toast};
use cn19::shared::protocol::{
    AddObservationRequest, DeleteObservationRequest, KmlLocationsRequest, KmlSearchRequest,
    ListObservationsRequest,
};
use cn19::shared::{DEFAULT_SEARCH_LIMIT, KmlLocation, LocationObservation};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LocationsMapPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();
    let (query, set_query) = signal(String::new());
    let (locations, set_locations) = signal(Vec::<KmlLocation>::new());
    let (loading, set_loading) = signal(true);
    let (selected, set_selected) = signal(Option::<KmlLocation>::None);

    let load_all = move || {
        set_loading.set(true);
        spawn_local(async move {
            match call(&auth, KmlLocationsRequest).await {
                Ok(list) => set_locations.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar localizações"),
            }
            set_loading.set(false);
        });
    };
    load_all();

    let search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let term = query.get();
        if term.trim().is_empty() {
            load_all();
            return;
        }
        let req = match KmlSearchRequest::new(&term, DEFAULT_SEARCH_LIMIT) {
            Ok(req) => req,
            Err(e) => {
                notifier.error(e.to_string());
                return;
            }
        };
        set_loading.set(true);
        spawn_local(async move {
            match call(&auth, req).await {
                Ok(resp) => {
                    if resp.total_found == 0 {
                        notifier.error(format!("Nenhum local encontrado para \"{}\"", resp.query));
                    }
                    set_locations.set(resp.locations);
                }
                Err(e) => notifier.api_error(&e, "Erro na busca"),
            }
            set_loading.set(false);
        });
    };

    view! {
        <AppShell>
            <Toast notifier=notifier />
            <h1 class="text-2xl font-bold flex items-center gap-2"><MapPin attr:class="h-6 w-6" /> "Sites"</h1>
            <form class="join w-full" on:submit=search>
                <input type="text" class="input input-bordered join-item grow" placeholder="Buscar site pelo nome..."
                    prop:value=query on:input=move |ev| set_query.set(event_target_value(&ev)) />
                <button type="submit" class="btn btn-primary join-item gap-1"><Search attr:class="h-4 w-4" /> "Buscar"</button>
            </form>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
                <div class="lg:col-span-2 space-y-2">
                    <Show when=move || loading.get()>
                        <Spinner />
                    </Show>
                    <Show when=move || !loading.get() && locations.with(Vec::is_empty)>
                        <p class="text-center py-8 text-base-content/50">"Nenhuma localização cadastrada."</p>
                    </Show>
                    {move || locations.get().into_iter().map(|loc| {
                        let pick = loc.clone();
                        let is_selected = {
                            let id = loc.id.clone();
                            move || selected.with(|s| s.as_ref().is_some_and(|s| s.id == id))
                        };
                        view! {
                            <div class=move || if is_selected() { "card bg-primary/10 border border-primary cursor-pointer" } else { "card bg-base-100 shadow cursor-pointer" }
                                on:click=move |_| set_selected.set(Some(pick.clone()))>
                                <div class="card-body p-3 flex-row items-center justify-between">
                                    <div>
                                        <p class="font-medium">{loc.display_name().to_string()}</p>
                                        {loc.description.clone().map(|d| view! { <p class="text-xs opacity-60 line-clamp-2">{d}</p> })}
                                    </div>
                                    {loc.maps_url().map(|url| view! {
                                        <a href=url target="_blank" rel="noopener" class="btn btn-ghost btn-sm"
                                            on:click=|ev| ev.stop_propagation()>
                                            <MapPin attr:class="h-4 w-4" /> "Mapa"
                                        </a>
                                    })}
                                </div>
                            </div>
                        }
                    }).collect_view()}
                </div>
                <div>
                    {move || match selected.get() {
                        Some(loc) => view! { <ObservationsPanel location=loc notifier=notifier /> }.into_any(),
                        None => view! {
                            <p class="text-sm text-base-content/50">"Selecione um local para ver as observações."</p>
                        }.into_any(),
                    }}
                </div>
            </div>
        </AppShell>
    }
}

/// 单个位置的备注列表；本人或管理员可删除
#[component]
fn ObservationsPanel(location: KmlLocation, notifier: Notifier) -> impl IntoView {
    let auth = use_auth();
    let (observations, set_observations) = signal(Vec::<LocationObservation>::new());
    let (text, set_text) = signal(String::new());
    let location_id = location.id.clone().unwrap_or_default();
    let has_id = !location_id.is_empty();

    if has_id {
        let location_id = location_id.clone();
        spawn_local(async move {
            match call(&auth, ListObservationsRequest { location_id }).await {
                Ok(list) => set_observations.set(list),
                Err(e) => notifier.api_error(&e, "Erro ao carregar observações"),
            }
        });
    }

    let add = {
        let location_id = location_id.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let req = match AddObservationRequest::new(location_id.clone(), &text.get()) {
                Ok(req) => req,
                Err(e) => {
                    notifier.error(e.to_string());
                    return;
                }
            };
            let location_id = location_id.clone();
            spawn_local(async move {
                match call(&auth, req).await {
                    Ok(resp) => {
                        notifier.success(resp.message);
                        set_text.set(String::new());
                        if let Ok(list) = call(&auth, ListObservationsRequest { location_id }).await {
                            set_observations.set(list);
                        }
                    }
                    Err(e) => notifier.api_error(&e, "Erro ao adicionar observação"),
                }
            });
        }
    };

    let remove = move |observation_id: String| {
        spawn_local(async move {
            let req = DeleteObservationRequest {
                observation_id: observation_id.clone(),
            };
            match call(&auth, req).await {
                Ok(resp) => {
                    notifier.success(resp.message);
                    set_observations.update(|list| list.retain(|o| o.id != observation_id));
                }
                Err(e) => notifier.api_error(&e, "Erro ao remover observação"),
            }
        });
    };

    let can_delete =
        move |obs: &LocationObservation| auth.user().is_some_and(|u| obs.deletable_by(&u));

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4">
                <h2 class="card-title gap-2"><MessageSquare attr:class="h-5 w-5" /> {location.display_name().to_string()}</h2>
                <Show when=move || has_id fallback=|| view! { <p class="text-sm opacity-60">"Local sem identificador."</p> }>
                    <ul class="space-y-2">
                        {move || observations.get().into_iter().map(|obs| {
                            let deletable = can_delete(&obs);
                            let id = obs.id.clone();
                            view! {
                                <li class="bg-base-200 rounded p-2">
                                    <div class="flex justify-between text-xs opacity-70">
                                        <span>{obs.username.clone()}</span>
                                        <span>{obs.created_at.as_ref().map(|d| d.display_brasilia())}</span>
                                    </div>
                                    <p class="text-sm">{obs.observation.clone()}</p>
                                    {deletable.then(|| view! {
                                        <button class="btn btn-ghost btn-xs text-error" on:click=move |_| remove(id.clone())>
                                            <Trash2 attr:class="h-3 w-3" /> "Remover"
                                        </button>
                                    })}
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                    <form class="space-y-2 mt-2" on:submit=add.clone()>
                        <textarea class="textarea textarea-bordered w-full" placeholder="Nova observação"
                            prop:value=text on:input=move |ev| set_text.set(event_target_value(&ev))></textarea>
                        <button type="submit" class="btn btn-primary btn-sm">"Adicionar"</button>
                    </form>
                </Show>
            </div>
        </div>
    }
}
