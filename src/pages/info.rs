use askama::Template;

use crate::i18n::Translator;
use crate::pages::layout::render_template;
use crate::pages::render_document;
use crate::routes::Page;

#[derive(Template)]
#[template(
    source = r#"<section class="page page-{{ suffix }}">
  <h1>{{ title }}</h1>
  <p>{{ description }}</p>
  {% match selected_service %}
  {% when Some with (service) %}
  <p class="selected-service">{{ service }}</p>
  {% when None %}
  {% endmatch %}
</section>
"#,
    ext = "html"
)]
struct InfoTemplate<'a> {
    suffix: &'static str,
    title: &'a str,
    description: String,
    selected_service: Option<String>,
}

/// Render a content page (services, pricing, about us, ...).
///
/// `service` is the optional `service` query value of the services page.
pub fn render_info(t: &Translator, current_path: &str, page: Page, service: Option<&str>) -> String {
    let Some(prefix) = page.content_key() else {
        return render_document(t, current_path, &t.t("site.name"), String::new());
    };

    let title = t.t(&format!("{}.title", prefix));
    let selected_service = match (page, service) {
        (Page::Services, Some(service)) => {
            Some(t.t_with("pages.services.selected", &[("service", service)]))
        }
        _ => None,
    };

    let body = render_template(&InfoTemplate {
        suffix: page.suffix(),
        title: &title,
        description: t.t(&format!("{}.description", prefix)),
        selected_service,
    });

    render_document(t, current_path, &title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn test_every_content_page_has_title() {
        let t = Translator::new(Locale::ENGLISH);
        for page in Page::ALL {
            let Some(prefix) = page.content_key() else {
                continue;
            };
            let title_key = format!("{}.title", prefix);
            assert_ne!(t.t(&title_key), title_key, "missing title for {:?}", page);
        }
    }

    #[test]
    fn test_services_echoes_selected_service() {
        let html = render_info(
            &Translator::new(Locale::ENGLISH),
            "/en/services?service=Cloud",
            Page::Services,
            Some("<Cloud>"),
        );
        assert!(html.contains("Service: &lt;Cloud&gt;"));
    }

    #[test]
    fn test_service_param_ignored_elsewhere() {
        let html = render_info(
            &Translator::new(Locale::ENGLISH),
            "/en/pricing",
            Page::Pricing,
            Some("Cloud"),
        );
        assert!(!html.contains("selected-service"));
        assert!(html.contains("<h1>Pricing</h1>"));
    }
}
