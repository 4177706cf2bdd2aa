use askama::Template;

use crate::i18n::Translator;
use crate::listings::ListingKind;
use crate::pages::layout::render_template;
use crate::pages::render_document;
use crate::routes::Page;

/// Lead form values and outcome to show on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeView {
    pub email: String,
    pub search: String,
    pub filter_type: Option<ListingKind>,
    pub error_key: Option<&'static str>,
    pub success: bool,
}

const AUDIENCE_CARDS: [(Page, &str, &str); 4] = [
    (Page::Vendor, "nav.vendor", "home.vendorText"),
    (Page::Buyer, "nav.buyer", "home.buyerText"),
    (Page::Startup, "nav.startup", "home.startupText"),
    (Page::Investor, "nav.investor", "home.investorText"),
];

struct AudienceCard {
    href: String,
    title: String,
    text: String,
}

struct KindOption {
    value: &'static str,
    label: String,
    checked: bool,
}

#[derive(Template)]
#[template(
    source = r##"<section class="hero">
  <h1>{{ t.t("site.name") }}</h1>
  <p class="tagline">{{ t.t("site.tagline") }}</p>
  {% for line in introduction %}
  <p>{{ line }}</p>
  {% endfor %}
  <a class="cta" href="#lead">{{ t.t("home.letsGo") }}</a>
</section>
<section class="audiences">
  {% for card in cards %}
  <article class="card"><h3><a href="{{ card.href }}">{{ card.title }}</a></h3><p>{{ card.text }}</p></article>
  {% endfor %}
</section>
<section id="lead" class="lead-form">
  <h2>{{ t.t("home.leadFormTitle") }}</h2>
  {% match error %}
  {% when Some with (message) %}
  <p class="error" role="alert">{{ message }}</p>
  {% when None %}
  {% if success %}
  <p class="success" role="status">{{ t.t("home.successMessage") }}</p>
  {% endif %}
  {% endmatch %}
  <form action="/leads" method="post" onsubmit="this.querySelector('button[type=submit]').disabled = true">
    <input type="hidden" name="lang" value="{{ lang }}">
    <label>{{ t.t("home.emailLabel") }} <input type="email" name="email" value="{{ email }}"></label>
    <input type="search" name="search" value="{{ search }}" placeholder="{{ t.t("home.searchPlaceholder") }}">
    {% for option in kinds %}
    <label><input type="radio" name="type" value="{{ option.value }}"{% if option.checked %} checked{% endif %}> {{ option.label }}</label>
    {% endfor %}
    <button type="submit">{{ t.t("home.submitButton") }}</button>
  </form>
</section>
"##,
    ext = "html"
)]
struct HomeTemplate<'a> {
    t: &'a Translator,
    lang: &'static str,
    introduction: Vec<String>,
    cards: Vec<AudienceCard>,
    error: Option<String>,
    success: bool,
    email: &'a str,
    search: &'a str,
    kinds: Vec<KindOption>,
}

pub fn render_home(t: &Translator, current_path: &str, view: &HomeView) -> String {
    let locale = t.locale();

    let cards = AUDIENCE_CARDS
        .iter()
        .map(|(page, title, text)| AudienceCard {
            href: page.path(locale),
            title: t.t(title),
            text: t.t(text),
        })
        .collect();

    let kinds = [
        (ListingKind::Software, "home.softwareFilter"),
        (ListingKind::Startup, "home.startupFilter"),
    ]
    .into_iter()
    .map(|(kind, key)| KindOption {
        value: kind.as_str(),
        label: t.t(key),
        checked: view.filter_type == Some(kind),
    })
    .collect();

    let body = render_template(&HomeTemplate {
        t,
        lang: locale.code(),
        introduction: t.t("home.introduction").lines().map(str::to_string).collect(),
        cards,
        error: view.error_key.map(|key| t.t(key)),
        success: view.success,
        email: &view.email,
        search: &view.search,
        kinds,
    });

    render_document(t, current_path, &t.t("nav.home"), body)
}
