use lumina_config::Config;
use lumina_engine::{EditorSettings, Size};

/// Translate the user's config file into engine settings
pub fn editor_settings(config: &Config) -> EditorSettings {
    EditorSettings {
        canvas: Size::new(config.canvas.width, config.canvas.height),
        zoom: config.viewport.zoom,
        min_zoom: config.viewport.min_zoom,
        max_zoom: config.viewport.max_zoom,
        zoom_step: config.viewport.zoom_step,
        show_grid: config.viewport.show_grid,
        snap_to_grid: config.viewport.snap_to_grid,
        grid_size: config.viewport.grid_size,
        history_limit: config.history.limit,
        commit_on_release: config.history.commit_on_release,
        coalesce_field_edits: config.history.coalesce_field_edits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_config::{HistoryConfig, ViewportConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_matches_engine_defaults() {
        assert_eq!(editor_settings(&Config::default()), EditorSettings::default());
    }

    #[test]
    fn test_overrides_are_carried_over() {
        let config = Config {
            viewport: ViewportConfig {
                zoom: 1.0,
                snap_to_grid: true,
                ..ViewportConfig::default()
            },
            history: HistoryConfig {
                limit: Some(25),
                commit_on_release: false,
                coalesce_field_edits: true,
            },
            ..Config::default()
        };

        let settings = editor_settings(&config);

        assert_eq!(settings.zoom, 1.0);
        assert!(settings.snap_to_grid);
        assert_eq!(settings.history_limit, Some(25));
        assert!(!settings.commit_on_release);
        assert!(settings.coalesce_field_edits);
    }
}
