use crate::auth::{call, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, Spinner};
use crate::components::notice::{Notifier, Toast};
use cn19::shared::protocol::{
    DistributionReportRequest, PerformanceReportRequest, TimelineReportRequest,
};
use cn19::shared::{Distribution, Performance, TimelinePoint};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 条形图宽度百分比
fn bar_width(count: u64, max: u64) -> String {
    if max == 0 {
        return "width: 0%".to_string();
    }
    format!("width: {:.0}%", count as f64 * 100.0 / max as f64)
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// 报表：月度趋势、分布、排名
#[component]
pub fn ReportsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (timeline, set_timeline) = signal(Option::<Vec<TimelinePoint>>::None);
    let (distribution, set_distribution) = signal(Option::<Distribution>::None);
    let (performance, set_performance) = signal(Option::<Performance>::None);

    let load_timeline = move || {
        let req = TimelineReportRequest {
            start_date: non_empty(start_date.get_untracked()),
            end_date: non_empty(end_date.get_untracked()),
        };
        spawn_local(async move {
            match call(&auth, req).await {
                Ok(points) => set_timeline.set(Some(points)),
                Err(e) => notifier.api_error(&e, "Erro ao carregar relatório"),
            }
        });
    };
    load_timeline();

    spawn_local(async move {
        match call(&auth, DistributionReportRequest).await {
            Ok(d) => set_distribution.set(Some(d)),
            Err(e) => notifier.api_error(&e, "Erro ao carregar distribuição"),
        }
        match call(&auth, PerformanceReportRequest).await {
            Ok(p) => set_performance.set(Some(p)),
            Err(e) => notifier.api_error(&e, "Erro ao carregar desempenho"),
        }
    });

    view! {
        <AppShell>
            <Toast notifier=notifier />
            <h1 class="text-2xl font-bold flex items-center gap-2"><BarChart attr:class="h-6 w-6" /> "Relatórios"</h1>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Evolução mensal"</h2>
                    <div class="flex flex-wrap gap-2 items-end">
                        <label class="form-control">
                            <span class="label-text">"Início"</span>
                            <input type="date" class="input input-bordered input-sm" prop:value=start_date
                                on:input=move |ev| set_start_date.set(event_target_value(&ev)) />
                        </label>
                        <label class="form-control">
                            <span class="label-text">"Fim"</span>
                            <input type="date" class="input input-bordered input-sm" prop:value=end_date
                                on:input=move |ev| set_end_date.set(event_target_value(&ev)) />
                        </label>
                        <button class="btn btn-sm btn-primary" on:click=move |_| load_timeline()>"Aplicar"</button>
                    </div>
                    {move || match timeline.get() {
                        None => view! { <Spinner /> }.into_any(),
                        Some(points) if points.is_empty() => view! {
                            <p class="text-base-content/50">"Sem dados no período."</p>
                        }.into_any(),
                        Some(points) => {
                            let max = points.iter().map(|p| p.total).max().unwrap_or(0);
                            view! {
                                <table class="table table-sm">
                                    <thead><tr><th>"Mês"</th><th>"Total"</th><th>"Pendentes"</th><th>"Finalizadas"</th><th>"Aprovadas"</th><th class="w-1/3"></th></tr></thead>
                                    <tbody>
                                        {points.into_iter().map(|p| view! {
                                            <tr>
                                                <td>{p.period.clone()}</td>
                                                <td>{p.total}</td>
                                                <td>{p.pending}</td>
                                                <td>{p.finished}</td>
                                                <td>{p.approved}</td>
                                                <td><div class="bg-primary h-3 rounded" style=bar_width(p.total, max)></div></td>
                                            </tr>
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            }.into_any()
                        }
                    }}
                </div>
            </div>

            {move || distribution.get().map(|d| {
                let total = d.total();
                let rows = |items: Vec<(String, u64)>| {
                    let max = items.iter().map(|(_, c)| *c).max().unwrap_or(0);
                    items.into_iter().map(|(label, count)| view! {
                        <div class="flex items-center gap-2 text-sm">
                            <span class="w-32 truncate">{label}</span>
                            <div class="grow bg-base-200 rounded h-3">
                                <div class="bg-secondary h-3 rounded" style=bar_width(count, max)></div>
                            </div>
                            <span class="w-10 text-right">{count}</span>
                        </div>
                    }).collect_view()
                };
                let label = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
                let by_type = d.by_type.into_iter().map(|t| (label(t.tipo), t.count)).collect();
                let by_status = d.by_status.into_iter().map(|s| (label(s.status), s.count)).collect();
                let by_site = d.by_site.into_iter().map(|s| (label(s.site), s.count)).collect();
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <div class="card bg-base-100 shadow"><div class="card-body p-4 gap-2">
                            <h3 class="font-semibold">"Por tipo (" {total} ")"</h3>
                            {rows(by_type)}
                        </div></div>
                        <div class="card bg-base-100 shadow"><div class="card-body p-4 gap-2">
                            <h3 class="font-semibold">"Por status"</h3>
                            {rows(by_status)}
                        </div></div>
                        <div class="card bg-base-100 shadow"><div class="card-body p-4 gap-2">
                            <h3 class="font-semibold">"Sites com mais pendências"</h3>
                            {rows(by_site)}
                        </div></div>
                    </div>
                }
            })}

            {move || performance.get().map(|p| {
                let name = |u: Option<String>| u.unwrap_or_else(|| "-".to_string());
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="card bg-base-100 shadow"><div class="card-body p-4">
                            <h3 class="font-semibold">"Quem mais cria · " {p.period.clone()}</h3>
                            <table class="table table-sm">
                                <thead><tr><th>"#"</th><th>"Usuário"</th><th>"Criadas"</th><th>"Aprovadas"</th><th>"Taxa"</th></tr></thead>
                                <tbody>
                                    {p.top_creators.into_iter().enumerate().map(|(i, r)| view! {
                                        <tr>
                                            <td>{i + 1}</td>
                                            <td>{name(r.username)}</td>
                                            <td>{r.created}</td>
                                            <td>{r.approved}</td>
                                            <td>{format!("{:.1}%", r.approval_rate)}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div></div>
                        <div class="card bg-base-100 shadow"><div class="card-body p-4">
                            <h3 class="font-semibold">"Quem mais finaliza"</h3>
                            <table class="table table-sm">
                                <thead><tr><th>"#"</th><th>"Usuário"</th><th>"Finalizadas"</th><th>"Aprovadas"</th><th>"Taxa"</th></tr></thead>
                                <tbody>
                                    {p.top_finalizers.into_iter().enumerate().map(|(i, r)| view! {
                                        <tr>
                                            <td>{i + 1}</td>
                                            <td>{name(r.username)}</td>
                                            <td>{r.finished}</td>
                                            <td>{r.approved}</td>
                                            <td>{format!("{:.1}%", r.approval_rate)}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div></div>
                    </div>
                }
            })}
        </AppShell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_is_relative_to_max() {
        assert_eq!(bar_width(5, 10), "width: 50%");
        assert_eq!(bar_width(3, 0), "width: 0%");
    }

    #[test]
    fn blank_dates_are_omitted() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty("2024-05-01".into()), Some("2024-05-01".into()));
    }
}
