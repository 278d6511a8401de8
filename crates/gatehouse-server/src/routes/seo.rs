//! Crawler files and the web app manifest.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use http::header;
use serde::Serialize;

use crate::AppState;

/// Web app manifest served at `/manifest.webmanifest`.
#[derive(Clone, Debug, Serialize)]
pub struct WebManifest {
    name: &'static str,
    short_name: &'static str,
    description: &'static str,
    start_url: &'static str,
    display: &'static str,
    background_color: &'static str,
    theme_color: &'static str,
    icons: [ManifestIcon; 1],
}

#[derive(Clone, Debug, Serialize)]
struct ManifestIcon {
    src: &'static str,
    sizes: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

const MANIFEST: WebManifest = WebManifest {
    name: "Gatehouse",
    short_name: "Gatehouse",
    description: "Authentication, sessions and role-gated pages on Appwrite",
    start_url: "/",
    display: "standalone",
    background_color: "#fff",
    theme_color: "#3b82f6",
    icons: [ManifestIcon {
        src: "/favicon.ico",
        sizes: "any",
        kind: "image/x-icon",
    }],
};

/// `GET /robots.txt`: keep crawlers out of the dashboards.
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.backend.config().app.url.trim_end_matches('/').to_string();
    let body = format!(
        "User-Agent: *\nAllow: /\nAllow: /auth/**\nDisallow: /admin/**\nDisallow: /dashboard/**\n\nSitemap: {base}/sitemap.xml\n"
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// `GET /sitemap.xml`: the landing page only, last modified today.
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.backend.config().app.url.trim_end_matches('/').to_string();
    let lastmod = Utc::now().format("%Y-%m-%d");
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
<url>
<loc>{base}/</loc>
<xhtml:link rel="alternate" hreflang="en" href="{base}/" />
<lastmod>{lastmod}</lastmod>
<priority>1</priority>
</url>
</urlset>
"#
    );
    ([(header::CONTENT_TYPE, "application/xml")], body)
}

/// `GET /manifest.webmanifest`.
pub async fn manifest() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(MANIFEST),
    )
}
