//! 页面框架：导航栏 + 内容区

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::router::{Link, use_router};
use cn19::AppRoute;
use leptos::prelude::*;

#[component]
fn NavLink(to: AppRoute, children: Children) -> impl IntoView {
    let router = use_router();
    let class = move || {
        if router.current_route().get() == to {
            "btn btn-ghost btn-sm btn-active gap-2"
        } else {
            "btn btn-ghost btn-sm gap-2"
        }
    };

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <li>
            <a href=to.to_path() class=class on:click=on_click>{children()}</a>
        </li>
    }
}

/// 已登录页面的公共外壳
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let is_admin = move || auth.is_admin();
    let username = move || auth.state.with(|s| s.user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let initial = move || auth.state.with(|s| s.user.as_ref().map(|u| u.initial()).unwrap_or_default());

    let on_logout = move |_| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <ClipboardList attr:class="text-primary h-6 w-6" />
                    <span class="text-xl font-bold">"Gerenciador CN19"</span>
                </div>
                <ul class="menu menu-horizontal px-1 gap-1 hidden md:flex">
                    <NavLink to=AppRoute::Dashboard><ClipboardList attr:class="h-4 w-4" />"Pendências"</NavLink>
                    <NavLink to=AppRoute::CreatePendencia><Plus attr:class="h-4 w-4" />"Nova"</NavLink>
                    <NavLink to=AppRoute::Locations><MapPin attr:class="h-4 w-4" />"Sites"</NavLink>
                    <NavLink to=AppRoute::Reports><BarChart attr:class="h-4 w-4" />"Relatórios"</NavLink>
                    <Show when=is_admin>
                        <NavLink to=AppRoute::Admin><Settings attr:class="h-4 w-4" />"Admin"</NavLink>
                    </Show>
                </ul>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::Profile class="btn btn-ghost btn-sm gap-2">
                        <div class="avatar placeholder">
                            <div class="bg-primary text-primary-content rounded-full w-8">
                                <span>{initial}</span>
                            </div>
                        </div>
                        <span class="hidden md:inline">{username}</span>
                    </Link>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Sair"
                    </button>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
                {children()}
            </main>
        </div>
    }
}

/// 加载中的占位
#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
