#[cfg(feature = "ssr")]
#[derive(clap::Parser)]
#[command(name = "docs-widgets", about = "Preview server for the documentation widgets")]
struct Args {
    /// Preview config (site origin, prompt templates)
    #[arg(long, env = "DOCS_WIDGETS_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Listen address (defaults to the cargo-leptos site-addr)
    #[arg(long, env = "DOCS_WIDGETS_ADDR")]
    addr: Option<std::net::SocketAddr>,
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use axum::Router;
    use clap::Parser;
    use docs_widgets::preview::{PreviewConfig, bundle_script};
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use tower_http::compression::CompressionLayer;
    use tower_http::services::ServeDir;

    let args = Args::parse();
    let preview = PreviewConfig::load(args.config.as_deref())?;
    let host_script = preview.host_script()?;

    let conf = get_configuration(None).context("Failed to load Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = args.addr.unwrap_or(leptos_options.site_addr);
    let routes = generate_route_list(docs_widgets::app::App);
    let bundle = bundle_script(&leptos_options.site_pkg_dir, &leptos_options.output_name);

    let site_root = leptos_options.site_root.clone();
    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let preview = preview.clone();
                move || provide_context(preview.clone())
            },
            move || {
                use docs_widgets::app::App;
                let host_script = host_script.clone();
                let bundle = bundle.clone();
                view! {
                    <!DOCTYPE html>
                    <html lang="ru">
                        <head>
                            <meta charset="utf-8" />
                            <meta name="viewport" content="width=device-width, initial-scale=1" />
                            <link rel="stylesheet" href="/pkg/docs-widgets.css" />
                            {host_script.map(|js| view! { <script inner_html=js></script> })}
                            <script type="module" inner_html=bundle></script>
                        </head>
                        <body>
                            <App />
                        </body>
                    </html>
                }
            },
        )
        .fallback_service(ServeDir::new(&*site_root))
        .layer(CompressionLayer::new())
        .with_state(leptos_options);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("[preview] Listening on http://{}", addr);
    println!("[preview] Try http://{}/en/guide and http://{}/ru/guide", addr, addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // The widgets themselves ship as WASM (`hydrate`); the preview server needs `ssr`
}
