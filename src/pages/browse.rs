use askama::Template;

use crate::i18n::Translator;
use crate::listings::{BrowseSession, FilterField, ListingKind, ListingRecord, LoadPhase};
use crate::pages::layout::render_template;
use crate::pages::render_document;
use crate::routes::{encode_query, BrowseQuery, Page};

const CARD_FIELDS: [FilterField; 7] = [
    FilterField::Category,
    FilterField::Headquarters,
    FilterField::Audience,
    FilterField::ValueProposition,
    FilterField::Problem,
    FilterField::Solution,
    FilterField::Context,
];

fn title_key(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Software => "browse.titleSoftware",
        ListingKind::Startup => "browse.titleStartups",
    }
}

struct Hidden {
    name: &'static str,
    value: String,
}

struct SelectOption {
    value: String,
    selected: bool,
}

struct Control {
    label: String,
    name: &'static str,
    value: String,
    /// Present for faceted fields, rendered as a `<select>`.
    options: Option<Vec<SelectOption>>,
}

struct Detail {
    label: String,
    value: String,
}

struct Card {
    kind: &'static str,
    name: String,
    logo: Option<String>,
    details: Vec<Detail>,
    features: Vec<String>,
    contact: Option<String>,
}

#[derive(Template)]
#[template(
    source = r#"<section class="browse browse-{{ kind }}">
  <h1>{{ title }}</h1>
  {% for notice in notices %}
  <p class="notice">{{ notice }}</p>
  {% endfor %}
  <form class="filters" action="{{ action }}" method="get">
    {% for input in hidden %}
    <input type="hidden" name="{{ input.name }}" value="{{ input.value }}">
    {% endfor %}
    {% for control in controls %}
    {% match control.options %}
    {% when Some with (options) %}
    <label>{{ control.label }} <select name="{{ control.name }}"><option value="">{{ t.t("browse.allOptions") }}</option>{% for option in options %}<option value="{{ option.value }}"{% if option.selected %} selected{% endif %}>{{ option.value }}</option>{% endfor %}</select></label>
    {% when None %}
    <label>{{ control.label }} <input type="text" name="{{ control.name }}" value="{{ control.value }}"></label>
    {% endmatch %}
    {% endfor %}
    <button type="submit">{{ t.t("browse.search") }}</button>
    <a class="reset" href="{{ action }}?{{ reset_query }}">{{ t.t("browse.reset") }}</a>
  </form>
  {% if loading %}
  <p class="loading" aria-busy="true">{{ t.t("browse.loading") }}</p>
  {% else if failed %}
  <p class="error" role="alert">{{ t.t("browse.loadError") }}</p>
  {% else if cards.is_empty() %}
  <div class="no-results"><p>{{ t.t("browse.noResults") }}</p><p>{{ t.t("browse.noResultsHint") }}</p></div>
  {% else %}
  <p class="count">{{ count }}</p>
  <div class="listings">
    {% for card in cards %}
    <article class="listing listing-{{ card.kind }}">
      {% match card.logo %}{% when Some with (logo) %}<img src="{{ logo }}" alt="">{% when None %}{% endmatch %}
      <h3>{{ card.name }}</h3>
      <dl>
        {% for detail in card.details %}
        <dt>{{ detail.label }}</dt><dd>{{ detail.value }}</dd>
        {% endfor %}
      </dl>
      {% if !card.features.is_empty() %}
      <h4>{{ t.t("browse.mainFeatures") }}</h4>
      <ul>
        {% for feature in card.features %}
        <li>{{ feature }}</li>
        {% endfor %}
      </ul>
      {% endif %}
      {% match card.contact %}
      {% when Some with (email) %}
      <a class="contact" href="mailto:{{ email }}">{{ t.t("browse.contact") }}</a>
      {% when None %}
      {% endmatch %}
    </article>
    {% endfor %}
  </div>
  {% endif %}
</section>
"#,
    ext = "html"
)]
struct BrowseTemplate<'a> {
    t: &'a Translator,
    kind: &'static str,
    title: &'a str,
    notices: Vec<String>,
    action: String,
    hidden: Vec<Hidden>,
    controls: Vec<Control>,
    reset_query: String,
    loading: bool,
    failed: bool,
    count: String,
    cards: Vec<Card>,
}

/// Read-only browse inputs carried through a search and the reset link.
fn carried_pairs(query: &BrowseQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("type", query.kind.as_str().to_string())];
    if let Some(email) = &query.email {
        pairs.push(("email", email.clone()));
    }
    if let Some(search) = &query.search {
        pairs.push(("search", search.clone()));
    }
    pairs
}

fn control(t: &Translator, session: &BrowseSession, field: FilterField) -> Control {
    let current = session.criteria().get(field).unwrap_or_default();

    let options = field.is_faceted().then(|| {
        let facet_options = session.facets().options(field);
        let mut options: Vec<SelectOption> = facet_options
            .iter()
            .map(|option| SelectOption {
                value: option.clone(),
                selected: option == current,
            })
            .collect();
        // An active value outside the facets must survive the next submit.
        if !current.is_empty() && !facet_options.iter().any(|option| option == current) {
            options.insert(
                0,
                SelectOption {
                    value: current.to_string(),
                    selected: true,
                },
            );
        }
        options
    });

    Control {
        label: t.t(field.label_key()),
        name: field.query_key(),
        value: current.to_string(),
        options,
    }
}

fn detail(t: &Translator, key: &str, value: Option<&str>) -> Option<Detail> {
    value.filter(|value| !value.trim().is_empty()).map(|value| Detail {
        label: t.t(key),
        value: value.to_string(),
    })
}

fn card(t: &Translator, record: &ListingRecord) -> Card {
    let common = record.common();
    let mut details: Vec<Detail> = CARD_FIELDS
        .into_iter()
        .filter_map(|field| detail(t, field.label_key(), record.field(field)))
        .collect();

    let (features, contact) = match record {
        ListingRecord::Software(software) => {
            details.extend(detail(t, "browse.fields.price", software.price.as_deref()));
            let rating = software.rating.map(|rating| format!("{:.1}", rating));
            details.extend(detail(t, "browse.rating", rating.as_deref()));
            (
                software.main_features.clone().unwrap_or_default(),
                software.email.clone(),
            )
        }
        ListingRecord::Startup(startup) => {
            details.extend(detail(t, "browse.founder", startup.founder_name.as_deref()));
            details.extend(detail(t, "browse.stage", startup.stage.as_deref()));
            details.extend(detail(t, "browse.minInvestment", startup.min_investment.as_deref()));
            (Vec::new(), None)
        }
    };

    Card {
        kind: record.kind().as_str(),
        name: common.name.clone().unwrap_or_default(),
        logo: common.logo.clone(),
        details,
        features,
        contact,
    }
}

/// Render the browse page for a loaded (or failed) session.
pub fn render_browse(
    t: &Translator,
    current_path: &str,
    query: &BrowseQuery,
    session: &BrowseSession,
) -> String {
    let title = t.t(title_key(query.kind));

    let mut notices = Vec::new();
    if let Some(email) = &query.email {
        notices.push(t.t_with("browse.leadNotice", &[("email", email.as_str())]));
    }
    if let Some(search) = &query.search {
        notices.push(t.t_with("browse.searchNotice", &[("search", search.as_str())]));
    }

    let carried = carried_pairs(query);
    let shown = session.filtered().len().to_string();
    let total = session.records().len().to_string();
    let ready = session.phase() == LoadPhase::Ready;

    let body = render_template(&BrowseTemplate {
        t,
        kind: query.kind.as_str(),
        title: &title,
        notices,
        action: Page::Browse.path(t.locale()),
        hidden: carried
            .iter()
            .map(|(name, value)| Hidden {
                name: *name,
                value: value.clone(),
            })
            .collect(),
        controls: FilterField::ALL
            .into_iter()
            .filter(|field| field.applies_to(query.kind))
            .map(|field| control(t, session, field))
            .collect(),
        reset_query: encode_query(&carried),
        loading: matches!(session.phase(), LoadPhase::Loading | LoadPhase::Idle),
        failed: session.phase() == LoadPhase::Failed,
        count: t.t_with(
            "browse.showing",
            &[("shown", shown.as_str()), ("total", total.as_str())],
        ),
        cards: if ready {
            session.filtered().iter().map(|record| card(t, record)).collect()
        } else {
            Vec::new()
        },
    });

    render_document(t, current_path, &title, body)
}
