//! Shared document shell: head, navbar, mobile drawer and footer.

use askama::Template;
use chrono::Datelike;
use tracing::error;

use crate::i18n::{Locale, Translator};
use crate::routes::{encode_component, Page};

const SERVICE_PAGES: [(Page, &str); 4] = [
    (Page::Vendor, "nav.vendor"),
    (Page::Buyer, "nav.buyer"),
    (Page::Startup, "nav.startup"),
    (Page::Investor, "nav.investor"),
];

const MAIN_PAGES: [(Page, &str); 5] = [
    (Page::Home, "nav.home"),
    (Page::Pricing, "nav.pricing"),
    (Page::Newsletter, "nav.newsletter"),
    (Page::AboutUs, "nav.aboutUs"),
    (Page::ContactUs, "nav.contactUs"),
];

const DRAWER_EXTRA: [(Page, &str); 2] = [(Page::Software, "nav.software"), (Page::Login, "nav.login")];

const RENDER_FAILURE: &str = "<!DOCTYPE html>\n<html lang=\"en\" dir=\"ltr\"><head><meta charset=\"utf-8\"><title>Error</title></head><body><p>Something went wrong.</p></body></html>\n";

/// Link that switches the site language while staying on `current_path`.
pub fn language_link(target: Locale, current_path: &str) -> String {
    format!(
        "/change-language?to={}&from={}",
        target.code(),
        encode_component(current_path)
    )
}

/// Render a template, degrading to a static error document on failure.
pub(crate) fn render_template<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|err| {
        error!("Template rendering failed: {}", err);
        RENDER_FAILURE.to_string()
    })
}

struct NavLink {
    href: String,
    label: String,
    current: bool,
}

impl NavLink {
    fn new(t: &Translator, page: Page, key: &str, current_path: &str) -> Self {
        let href = page.path(t.locale());
        let current = current_path.split('?').next() == Some(href.as_str());
        Self {
            href,
            label: t.t(key),
            current,
        }
    }

    fn all(t: &Translator, pages: &[(Page, &str)], current_path: &str) -> Vec<Self> {
        pages
            .iter()
            .map(|(page, key)| Self::new(t, *page, key, current_path))
            .collect()
    }
}

struct LanguageLink {
    href: String,
    code: &'static str,
    native_name: &'static str,
    current: bool,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="{{ lang }}" dir="{{ dir }}">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{ title }} | {{ t.t("site.name") }}</title>
  </head>
  <body>
    <header>
      <nav class="navbar">
        <a class="brand" href="{{ home_href }}">{{ t.t("site.name") }}</a>
        <details class="submenu" data-menu="services">
          <summary>{{ t.t("nav.services") }}</summary>
          <ul>
            {% for link in services %}
            <li><a href="{{ link.href }}"{% if link.current %} aria-current="page"{% endif %}>{{ link.label }}</a></li>
            {% endfor %}
          </ul>
        </details>
        {% for link in main %}
        <a href="{{ link.href }}"{% if link.current %} aria-current="page"{% endif %}>{{ link.label }}</a>
        {% endfor %}
        <a href="{{ software.href }}"{% if software.current %} aria-current="page"{% endif %}>{{ software.label }}</a>
        <details class="submenu" data-menu="language">
          <summary>{{ t.t("nav.language") }}</summary>
          <ul>
            {% for language in languages %}
            <li><a href="{{ language.href }}" lang="{{ language.code }}" hreflang="{{ language.code }}"{% if language.current %} aria-current="true"{% endif %}>{{ language.native_name }}</a></li>
            {% endfor %}
          </ul>
        </details>
        <a class="login" href="{{ login_href }}">{{ t.t("nav.login") }}</a>
        <a class="register" href="{{ login_href }}">{{ t.t("nav.register") }}</a>
      </nav>
      <details class="drawer">
        <summary aria-label="{{ t.t("nav.openMenu") }}">&#9776;</summary>
        <ul>
          {% for link in drawer %}
          <li><a href="{{ link.href }}"{% if link.current %} aria-current="page"{% endif %}>{{ link.label }}</a></li>
          {% endfor %}
          {% for language in languages %}
          <li><a href="{{ language.href }}" lang="{{ language.code }}" hreflang="{{ language.code }}">{{ language.native_name }}</a></li>
          {% endfor %}
        </ul>
      </details>
    </header>
    <main>
{{ body|safe }}
    </main>
    <footer>
      <form class="newsletter" action="{{ newsletter_href }}" method="get">
        <input type="email" name="email" placeholder="{{ t.t("footer.emailPlaceholder") }}">
        <button type="submit">{{ t.t("footer.subscribe") }}</button>
      </form>
      <p>{{ rights }}</p>
    </footer>
  </body>
</html>
"#,
    ext = "html"
)]
struct DocumentTemplate<'a> {
    t: &'a Translator,
    lang: &'static str,
    dir: &'static str,
    title: &'a str,
    home_href: String,
    login_href: String,
    newsletter_href: String,
    services: Vec<NavLink>,
    main: Vec<NavLink>,
    software: NavLink,
    drawer: Vec<NavLink>,
    languages: Vec<LanguageLink>,
    rights: String,
    body: String,
}

/// Wrap the rendered `body` in the full page shell. The document carries the
/// active locale's language code and text direction.
pub fn render_document(t: &Translator, current_path: &str, title: &str, body: String) -> String {
    let locale = t.locale();
    let year = chrono::Utc::now().year().to_string();

    let languages = Locale::enabled()
        .into_iter()
        .map(|target| LanguageLink {
            href: language_link(target, current_path),
            code: target.code(),
            native_name: target.native_name(),
            current: target == locale,
        })
        .collect();

    let mut drawer = NavLink::all(t, &MAIN_PAGES, current_path);
    drawer.extend(NavLink::all(t, &SERVICE_PAGES, current_path));
    drawer.extend(NavLink::all(t, &DRAWER_EXTRA, current_path));

    render_template(&DocumentTemplate {
        t,
        lang: locale.code(),
        dir: locale.direction().as_str(),
        title,
        home_href: Page::Home.path(locale),
        login_href: Page::Login.path(locale),
        newsletter_href: Page::Newsletter.path(locale),
        services: NavLink::all(t, &SERVICE_PAGES, current_path),
        main: NavLink::all(t, &MAIN_PAGES, current_path),
        software: NavLink::new(t, Page::Software, "nav.software", current_path),
        drawer,
        languages,
        rights: t.t_with("footer.rights", &[("year", year.as_str())]),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_link_encodes_path() {
        assert_eq!(
            language_link(Locale::ARABIC, "/en/browse?type=startup"),
            "/change-language?to=ar&from=%2Fen%2Fbrowse%3Ftype%3Dstartup"
        );
    }

    #[test]
    fn test_document_direction() {
        let html = render_document(&Translator::new(Locale::ARABIC), "/ar/home", "x", String::new());
        assert!(html.contains(r#"<html lang="ar" dir="rtl">"#));

        let html = render_document(&Translator::new(Locale::ENGLISH), "/en/home", "x", String::new());
        assert!(html.contains(r#"<html lang="en" dir="ltr">"#));
    }

    #[test]
    fn test_navbar_marks_current_page() {
        let html = render_document(
            &Translator::new(Locale::ENGLISH),
            "/en/pricing",
            "Pricing",
            String::new(),
        );
        assert!(html.contains(r#"<a href="/en/pricing" aria-current="page">Pricing</a>"#));
        assert!(html.contains(r#"<a href="/en/vendor">Vendor</a>"#));
        assert!(html.contains("العربية"));
    }

    #[test]
    fn test_title_is_escaped_and_body_is_not() {
        let html = render_document(
            &Translator::new(Locale::ENGLISH),
            "/en/home",
            "<Tom & Jerry>",
            "<p>kept</p>".to_string(),
        );
        assert!(html.contains("<title>&lt;Tom &amp; Jerry&gt; | StellarSep</title>"));
        assert!(html.contains("<p>kept</p>"));
    }

    #[test]
    fn test_language_links_escape_query_separator() {
        let html = render_document(
            &Translator::new(Locale::ENGLISH),
            "/en/vendor",
            "Vendor",
            String::new(),
        );
        assert!(html.contains(r#"href="/change-language?to=ar&amp;from=%2Fen%2Fvendor""#));
    }
}
