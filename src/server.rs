use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::contact::form::ContactForm;
use crate::contact::guard::SpamGuard;
use crate::contact::issued::IssuedForms;
use crate::contact::relay::{HttpRelay, LogRelay};
use crate::content::markdown_renderer::{MarkdownRenderer, RawHtml};
use crate::content::page::load_page;
use crate::content::post_store::{categories_of, PostStore};
use crate::query_string::QueryString;
use crate::resume::export::{export_resume, ExportState};
use crate::resume::Resume;
use crate::view::contact_renderer::ContactRenderer;
use crate::view::list_renderer::{IndexRenderer, ListRenderer};
use crate::view::page_renderer::PageRenderer;
use crate::view::post_renderer::{NotFoundRenderer, PostRenderer};
use crate::view::resume_renderer::ResumeRenderer;
use crate::view::SiteInfo;

struct AppState {
    config: Config,
    posts: PostStore,
    pages: MarkdownRenderer,
    guard: SpamGuard,
    issued: IssuedForms,
    export: ExportState,
}

impl AppState {
    fn new(config: Config) -> io::Result<Self> {
        let raw_html = RawHtml::from(config.defaults.allow_raw_html);
        let posts = PostStore::new(&config.paths.posts_dir, &config.defaults.index_base_name, MarkdownRenderer::new(raw_html));
        Ok(AppState {
            posts,
            pages: MarkdownRenderer::new(raw_html),
            guard: SpamGuard::new(config.contact.min_elapsed_secs)?,
            issued: IssuedForms::default(),
            export: ExportState::new(),
            config,
        })
    }

    fn site(&self) -> SiteInfo {
        SiteInfo {
            title: &self.config.site.title,
            tagline: &self.config.site.tagline,
            author: &self.config.site.author,
        }
    }

    /// Templates are read on every request so edits show up without a restart.
    fn read_template(&self, name: &str) -> io::Result<String> {
        let path = self.config.paths.template_dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(src) => Ok(src),
            Err(e) => Err(io::Error::new(e.kind(), format!("Error loading template {}: {}", path.display(), e))),
        }
    }

    fn load_resume(&self) -> io::Result<Resume> {
        Resume::load_or_builtin(self.config.resume.source.as_deref())
    }
}

type SharedState = web::types::State<Arc<AppState>>;

fn html(rendered: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(rendered)
}

fn internal_error(what: &str, e: io::Error) -> web::HttpResponse {
    error!("{}: {}", what, e);
    web::HttpResponse::InternalServerError()
        .body(format!("{}: {}", what, e))
}

fn redirect(location: String) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", location)
        .content_type("text/html; charset=utf-8")
        .finish()
}

fn not_found_response(state: &AppState, missing_post: bool) -> web::HttpResponse {
    let rendered = state.read_template("not_found.tpl")
        .and_then(|src| {
            let renderer = NotFoundRenderer::new(&src)?;
            let rendered = if missing_post {
                renderer.render_post_not_found(&state.site())
            } else {
                renderer.render_page_not_found(&state.site())
            };
            Ok(rendered)
        });

    match rendered {
        Ok(rendered) => web::HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => internal_error("Error rendering not found page", e),
    }
}

fn fresh_seed() -> u64 {
    Uuid::new_v4().as_u64_pair().0
}

fn path_is_safe(part: &str) -> bool {
    !part.contains("..") && !part.contains('/') && !part.contains('\\')
}

// Begin: Redirect region --------
#[web::get("/blog/{slug}")]
async fn post_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    redirect(format!("/blog/{}/", path.into_inner()))
}

#[web::get("/page/{name}")]
async fn page_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    redirect(format!("/page/{}/", path.into_inner()))
}
// End: Redirect region --------

fn render_index(state: &AppState) -> io::Result<String> {
    let mut posts = state.posts.list_posts()?;
    posts.truncate(state.config.defaults.recent_post_count);
    let src = state.read_template("index.tpl")?;
    let rendered = IndexRenderer::new(&src)?.render(&state.site(), &posts);
    Ok(rendered)
}

#[web::get("/")]
async fn home(state: SharedState) -> web::HttpResponse {
    match render_index(&state) {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error("Error rendering home page", e),
    }
}

fn render_blog(state: &AppState, category: Option<&str>) -> io::Result<String> {
    let all_posts = state.posts.list_posts()?;
    let categories = categories_of(&all_posts);
    let posts = match category {
        Some(category) => state.posts.list_posts_in_category(category)?,
        None => all_posts,
    };

    let src = state.read_template("bloglist.tpl")?;
    let rendered = ListRenderer::new(&src)?.render(&state.site(), posts, &categories, category);
    Ok(rendered)
}

#[web::get("/blog")]
async fn blog_list(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or_default());
    match render_blog(&state, qs.get_category()) {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error("Error listing posts", e),
    }
}

#[web::get("/blog/{slug}/")]
async fn post_view(slug: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let slug = slug.into_inner();
    let found = match state.posts.get_post_by_slug(&slug) {
        Ok(Some(found)) => found,
        Ok(None) => return not_found_response(&state, true),
        Err(e) => return internal_error(&format!("Error loading post {}", slug), e),
    };

    let rendered = state.read_template("post.tpl")
        .and_then(|src| {
            let rendered = PostRenderer::new(&src)?.render(&state.site(), &found);
            Ok(rendered)
        });
    match rendered {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error(&format!("Error rendering post {}", slug), e),
    }
}

#[web::get("/blog/{slug}/{file}")]
async fn post_files(path: web::types::Path<(String, String)>, state: SharedState) -> Result<NamedFile, web::Error> {
    let (slug, file) = path.into_inner();
    if !path_is_safe(&slug) || !path_is_safe(&file) {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    match state.posts.asset_path(&slug, &file)? {
        Some(file_path) => Ok(NamedFile::open(file_path)?),
        None => Err(io::Error::new(ErrorKind::NotFound, format!("Post not found - slug={}", slug)).into()),
    }
}

#[web::get("/page/{name}/")]
async fn page_view(name: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let name = name.into_inner();
    let found = match load_page(&state.config.paths.pages_dir, &name, &state.pages) {
        Ok(Some(found)) => found,
        Ok(None) => return not_found_response(&state, false),
        Err(e) => return internal_error(&format!("Error loading page {}", name), e),
    };

    let rendered = state.read_template("page.tpl")
        .and_then(|src| {
            let rendered = PageRenderer::new(&src)?.render(&state.site(), &found);
            Ok(rendered)
        });
    match rendered {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error(&format!("Error rendering page {}", name), e),
    }
}

/// Every rendered form is registered first so its submission can be restored.
fn render_contact(state: &AppState, form: &ContactForm) -> web::HttpResponse {
    form.issue(&state.issued);
    let rendered = state.read_template("contact.tpl")
        .and_then(|src| {
            let rendered = ContactRenderer::new(&src)?.render(&state.site(), form);
            Ok(rendered)
        });
    match rendered {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error("Error rendering contact form", e),
    }
}

#[web::get("/contact")]
async fn contact_form(state: SharedState) -> web::HttpResponse {
    let form = ContactForm::new(fresh_seed(), Utc::now());
    render_contact(&state, &form)
}

#[web::post("/contact")]
async fn contact_submit(values: web::types::Form<HashMap<String, String>>, state: SharedState) -> web::HttpResponse {
    let values = values.into_inner();
    let now = Utc::now();

    let mut form = match ContactForm::restore(&values, &state.issued, now) {
        Some(form) => form,
        None => {
            info!("Contact submission without a known form");
            let mut form = ContactForm::new(fresh_seed(), now);
            form.reject();
            return render_contact(&state, &form);
        }
    };

    match state.config.contact.endpoint {
        Some(ref endpoint) => form.submit(&state.guard, &values, now, &HttpRelay::new(endpoint)).await,
        None => form.submit(&state.guard, &values, now, &LogRelay).await,
    };

    render_contact(&state, &form.renew(fresh_seed(), now))
}

#[web::get("/resume")]
async fn resume_page(state: SharedState) -> web::HttpResponse {
    let rendered = state.load_resume()
        .and_then(|resume| {
            let src = state.read_template("resume.tpl")?;
            let rendered = ResumeRenderer::new(&src)?.render(&state.site(), &resume, &state.config.resume.file_name);
            Ok(rendered)
        });
    match rendered {
        Ok(rendered) => html(rendered),
        Err(e) => internal_error("Error rendering resume page", e),
    }
}

#[web::get("/resume/download")]
async fn resume_download(state: SharedState) -> web::HttpResponse {
    let resume = match state.load_resume() {
        Ok(resume) => resume,
        Err(e) => {
            error!("Error loading resume: {}", e);
            return web::HttpResponse::NoContent().finish();
        }
    };

    match export_resume(&state.export, &resume) {
        Some(pdf) => web::HttpResponse::Ok()
            .content_type("application/pdf")
            .header("Content-Disposition", format!("attachment; filename=\"{}\"", state.config.resume.file_name))
            .body(pdf),
        None => web::HttpResponse::NoContent().finish(),
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: SharedState) -> Result<NamedFile, web::Error> {
    let file_name = path.into_inner();
    if !path_is_safe(&file_name) {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(file_name);
    Ok(NamedFile::open(file_path)?)
}

async fn unknown_route(state: SharedState) -> web::HttpResponse {
    not_found_response(&state, false)
}

fn check_dir(what: &str, dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        return Err(io::Error::new(ErrorKind::NotFound, format!("{} directory not found - dir={}", what, dir.display())));
    }
    Ok(())
}

pub async fn server_run(config: Config) -> io::Result<()> {
    check_dir("Template", &config.paths.template_dir)?;
    check_dir("Posts", &config.paths.posts_dir)?;
    check_dir("Pages", &config.paths.pages_dir)?;

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState::new(config)?);

    // A broken post fails the listing, so report it at startup too
    match app_state.posts.list_posts() {
        Ok(posts) => {
            for p in posts.iter() {
                info!("Post: {}", p.slug);
            }
        }
        Err(e) => error!("Error listing posts: {}", e),
    }

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(home)
            .service(public_files)
            .service(blog_list)
            .service(post_view)
            .service(post_wo_slash)
            .service(post_files)
            .service(page_view)
            .service(page_wo_slash)
            .service(contact_form)
            .service(contact_submit)
            .service(resume_page)
            .service(resume_download)
            .default_service(web::route().to(unknown_route))
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use ntex::http::StatusCode;
    use ntex::web::test;

    use crate::config::parse_config;
    use crate::contact::field_names::FieldNames;
    use crate::contact::form::{RENDERED_AT_FIELD, REJECTION_MESSAGE, SEED_FIELD, SUCCESS_MESSAGE};

    use super::*;

    fn test_state() -> Arc<AppState> {
        contact_state(3)
    }

    fn contact_state(min_elapsed_secs: i64) -> Arc<AppState> {
        Arc::new(AppState::new(test_config(min_elapsed_secs)).unwrap())
    }

    fn test_config(min_elapsed_secs: i64) -> Config {
        parse_config(&format!(r#"
[site]
title = "Folio"
author = "Jordan Example"

[paths]
template_dir = "res/template"
public_dir = "res/public"
posts_dir = "res/posts"
pages_dir = "res/pages"

[server]
address = "127.0.0.1"
port = 8001

[contact]
min_elapsed_secs = {}
"#, min_elapsed_secs)).unwrap()
    }

    macro_rules! test_app {
        () => {
            test_app!(test_state())
        };
        ($state:expr) => {
            test::init_service(
                web::App::new()
                    .state($state)
                    .service(home)
                    .service(public_files)
                    .service(blog_list)
                    .service(post_view)
                    .service(post_wo_slash)
                    .service(post_files)
                    .service(page_view)
                    .service(page_wo_slash)
                    .service(contact_form)
                    .service(contact_submit)
                    .service(resume_page)
                    .service(resume_download)
                    .default_service(web::route().to(unknown_route)),
            ).await
        };
    }

    #[test]
    fn test_path_is_safe() {
        assert!(path_is_safe("cover.png"));
        assert!(!path_is_safe("../folio.toml"));
        assert!(!path_is_safe(".."));
        assert!(!path_is_safe("a/b"));
    }

    #[ntex::test]
    async fn test_home_and_blog() {
        let app = test_app!();

        let resp = test::call_service(&app, test::TestRequest::with_uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/blog").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("/blog/hello-world/"));
    }

    #[ntex::test]
    async fn test_post_routes() {
        let app = test_app!();

        let resp = test::call_service(&app, test::TestRequest::with_uri("/blog/hello-world/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("<table>"));

        let resp = test::call_service(&app, test::TestRequest::with_uri("/blog/hello-world").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/blog/nonexistent/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("href=\"/blog\""));
    }

    #[ntex::test]
    async fn test_pages_and_unknown_routes() {
        let app = test_app!();

        let resp = test::call_service(&app, test::TestRequest::with_uri("/page/about/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/page/missing/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/no/such/route").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[ntex::test]
    async fn test_contact_rejects_missing_state() {
        let app = test_app!();

        let resp = test::call_service(&app, test::TestRequest::with_uri("/contact").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/contact")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .set_payload("name=Ada")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains(crate::contact::form::REJECTION_MESSAGE));
    }

    fn hidden_value(body: &str, field: &str) -> String {
        let marker = format!("name=\"{}\" value=\"", field);
        let start = body.find(&marker).unwrap() + marker.len();
        let len = body[start..].find('"').unwrap();
        body[start..start + len].to_string()
    }

    // Renders `/contact` and yields the seed and timestamp of the form
    macro_rules! fetch_form {
        ($app:expr) => {{
            let resp = test::call_service(&$app, test::TestRequest::with_uri("/contact").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = test::read_body(resp).await;
            let body = String::from_utf8_lossy(&body).to_string();
            (hidden_value(&body, SEED_FIELD).parse::<u64>().unwrap(), hidden_value(&body, RENDERED_AT_FIELD))
        }};
    }

    macro_rules! post_contact {
        ($app:expr, $payload:expr) => {{
            let req = test::TestRequest::post()
                .uri("/contact")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .set_payload($payload)
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = test::read_body(resp).await;
            String::from_utf8_lossy(&body).to_string()
        }};
    }

    fn submission(seed: u64, rendered_at: &str, honeypot: &str) -> String {
        let names = FieldNames::from_seed(seed);
        let fields = vec![
            (SEED_FIELD.to_string(), seed.to_string()),
            (RENDERED_AT_FIELD.to_string(), rendered_at.to_string()),
            (names.name, "Ada".to_string()),
            (names.email, "ada@example.com".to_string()),
            (names.subject, "Hello".to_string()),
            (names.message, "Nice site".to_string()),
            (names.honeypot, honeypot.to_string()),
            (names.confirm, "on".to_string()),
        ];
        serde_urlencoded::to_string(fields).unwrap()
    }

    #[ntex::test]
    async fn test_contact_accepts_and_renews_form() {
        let app = test_app!(contact_state(0));
        let (seed, rendered_at) = fetch_form!(app);

        let body = post_contact!(app, submission(seed, &rendered_at, ""));
        assert!(body.contains(SUCCESS_MESSAGE));
        let next_seed: u64 = hidden_value(&body, SEED_FIELD).parse().unwrap();
        assert_ne!(next_seed, seed);
        assert!(body.contains(&FieldNames::from_seed(next_seed).name));

        // The same form cannot be posted twice
        let body = post_contact!(app, submission(seed, &rendered_at, ""));
        assert!(body.contains(REJECTION_MESSAGE));
    }

    #[ntex::test]
    async fn test_contact_rejects_too_fast() {
        let app = test_app!(contact_state(60));
        let (seed, rendered_at) = fetch_form!(app);

        let body = post_contact!(app, submission(seed, &rendered_at, ""));
        assert!(body.contains(REJECTION_MESSAGE));
        assert!(body.contains("value=\"Ada\""));
    }

    #[ntex::test]
    async fn test_contact_rejects_backdated_form() {
        let app = test_app!(contact_state(60));
        let (seed, rendered_at) = fetch_form!(app);
        let backdated = rendered_at.parse::<i64>().unwrap() - 120_000;

        let body = post_contact!(app, submission(seed, &backdated.to_string(), ""));
        assert!(body.contains(REJECTION_MESSAGE));
        assert!(!body.contains(SUCCESS_MESSAGE));
    }

    #[ntex::test]
    async fn test_contact_rejects_honeypot() {
        let app = test_app!(contact_state(0));
        let (seed, rendered_at) = fetch_form!(app);

        let body = post_contact!(app, submission(seed, &rendered_at, "http://spam.example"));
        assert!(body.contains(REJECTION_MESSAGE));
        assert!(!body.contains(SUCCESS_MESSAGE));
    }

    #[test]
    fn test_invalid_min_elapsed_fails_startup() {
        assert!(AppState::new(test_config(i64::MAX)).is_err());
    }

    #[ntex::test]
    async fn test_resume_download() {
        let app = test_app!();

        let resp = test::call_service(&app, test::TestRequest::with_uri("/resume").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/resume/download").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp.headers().get("Content-Disposition").unwrap().to_str().unwrap().to_string();
        assert_eq!(disposition, "attachment; filename=\"resume.pdf\"");
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF-"));
    }

    #[ntex::test]
    async fn test_resume_download_busy() {
        let state = test_state();
        let _running = state.export.try_begin().unwrap();
        let app = test::init_service(
            web::App::new().state(state.clone()).service(resume_download),
        ).await;

        let resp = test::call_service(&app, test::TestRequest::with_uri("/resume/download").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
