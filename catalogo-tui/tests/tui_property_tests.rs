use catalogo_core::{RatingBand, Resource};
use catalogo_tui::config::{SessionConfig, ThemeConfig, TuiConfig};
use catalogo_tui::keys::{map_key, Action};
use catalogo_tui::nav::View;
use catalogo_tui::persistence::{self, PersistedState};
use catalogo_tui::theme::{rating_band_color, Theme};
use catalogo_tui::widgets::StarRating;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::style::Style;
use std::io::Write;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:3000/api".to_string(),
        session: SessionConfig {
            token: "test-token".to_string(),
            user_id: "user-1".to_string(),
            permissions: vec!["CATEGORIAS_ALL".to_string()],
        },
        request_timeout_ms: 5_000,
        refresh_interval_ms: 2_000,
        search_debounce_ms: 300,
        page_size: 10,
        persistence_path: "tmp/catalogo-tui.json".into(),
        log_path: "tmp/catalogo-tui.log".into(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_token() {
    let mut config = base_config();
    config.session.token = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_http_url() {
    let mut config = base_config();
    config.api_base_url = "ftp://localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_page_size() {
    let mut config = base_config();
    config.page_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
api_base_url = "https://catalogo.example.com/api"
request_timeout_ms = 5000
refresh_interval_ms = 1000
search_debounce_ms = 300
page_size = 10
persistence_path = "state.json"
log_path = "catalogo.log"

[session]
token = "abc"
user_id = "u1"
permissions = ["ETIQUETAS_ALL"]

[theme]
name = "mono"
"#
    )
    .unwrap();

    let config = TuiConfig::from_path(file.path()).unwrap();
    config.validate().unwrap();
    assert_eq!(config.session.permissions, vec!["ETIQUETAS_ALL".to_string()]);
    assert_eq!(config.page_size, 10);
}

#[test]
fn config_rejects_unknown_fields() {
    let result = TuiConfig::from_toml(
        r#"
api_base_url = "http://localhost"
request_timeout_ms = 5000
refresh_interval_ms = 1000
search_debounce_ms = 300
page_size = 10
persistence_path = "state.json"
log_path = "catalogo.log"
tenant_id = "nope"

[session]
token = "abc"
user_id = "u1"

[theme]
name = "mono"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    assert_eq!(persistence::load(&path).unwrap(), None);

    let state = PersistedState {
        active_view: View::CategoryDetail,
        last_category_id: Some("c1".into()),
    };
    persistence::save(&path, &state).unwrap();
    assert_eq!(persistence::load(&path).unwrap(), Some(state));
}

#[test]
fn persistence_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(persistence::load(&path).is_err());
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(press(KeyCode::Char(ch)));
        let expected = match ch {
            '1'..='5' => Some(Action::SwitchView(ch as usize - '1' as usize)),
            _ => None,
        };
        prop_assert_eq!(action, expected);
        if let Some(Action::SwitchView(index)) = action {
            prop_assert!(View::from_index(index).is_some());
        }
    }

    #[test]
    fn star_text_always_has_five_symbols(rating in -10i64..20) {
        let text = StarRating { rating, style: Style::default() }.text();
        prop_assert_eq!(text.chars().count(), 5);
        let filled = text.chars().filter(|c| *c == '★').count() as i64;
        prop_assert_eq!(filled, rating.clamp(0, 5));
    }

    #[test]
    fn every_rating_has_a_color(rating in any::<i64>()) {
        let theme = Theme::synthbrute();
        let band = RatingBand::from_rating(rating);
        let color = rating_band_color(band, &theme);
        let expected = if rating >= 4 {
            theme.success
        } else if rating >= 3 {
            theme.info
        } else if rating >= 2 {
            theme.warning
        } else {
            theme.error
        };
        prop_assert_eq!(color, expected);
    }

    #[test]
    fn view_cycle_visits_every_tab(start in 0usize..5) {
        let first = View::from_index(start).unwrap();
        let mut view = first;
        for _ in 0..View::all().len() {
            view = view.next();
        }
        prop_assert_eq!(view, first);
        prop_assert_eq!(first.next().previous(), first);
    }
}

#[test]
fn list_views_cover_every_resource() {
    let covered: Vec<Resource> = View::all().iter().filter_map(|v| v.resource()).collect();
    assert_eq!(covered, Resource::ALL.to_vec());
}
