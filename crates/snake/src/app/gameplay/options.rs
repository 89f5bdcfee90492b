use std::fs;
use std::path::{Path, PathBuf};

use engine::{BaseOptions, Color, GameError, GameOptions};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SnakeOptions {
    #[serde(skip)]
    pub(crate) base: BaseOptions,
    pub(crate) cell_size: u32,
    pub(crate) snake_speed: f32,
    pub(crate) speed_step: f32,
    pub(crate) snake_color: Color,
    pub(crate) head_color: Color,
    pub(crate) pickup_color: Color,
    pub(crate) background_color: Color,
    pub(crate) pickups_count: u32,
    pub(crate) starting_snake_length: u32,
}

impl Default for SnakeOptions {
    fn default() -> Self {
        let snake_speed = 3.0;
        Self {
            base: BaseOptions {
                target_fps: snake_speed,
                ..BaseOptions::default()
            },
            cell_size: 20,
            snake_speed,
            speed_step: 1.0,
            snake_color: Color::rgb(0xcc, 0xff, 0x11),
            head_color: Color::rgb(0x00, 0xff, 0x00),
            pickup_color: Color::rgb(0xff, 0x55, 0xcc),
            background_color: Color::rgb(0x66, 0x33, 0x00),
            pickups_count: 10,
            starting_snake_length: 4,
        }
    }
}

impl GameOptions for SnakeOptions {
    fn is_paused(&self) -> bool {
        self.base.is_paused
    }

    fn set_paused(&mut self, is_paused: bool) {
        self.base.is_paused = is_paused;
    }

    fn target_fps(&self) -> f32 {
        self.base.target_fps
    }
}

impl SnakeOptions {
    pub(crate) fn cell_size(&self) -> Result<u32, GameError> {
        match self.cell_size {
            0 => Err(GameError::MissingOption { name: "cell_size" }),
            size => Ok(size),
        }
    }

    pub(crate) fn pickups_count(&self) -> Result<u32, GameError> {
        match self.pickups_count {
            0 => Err(GameError::MissingOption {
                name: "pickups_count",
            }),
            count => Ok(count),
        }
    }

    /// Seconds between two snake steps at the current speed.
    pub(crate) fn step_interval(&self) -> f32 {
        1.0 / self.snake_speed
    }

    pub(crate) fn increase_speed(&mut self) {
        self.snake_speed += self.speed_step;
        self.base.target_fps = self.snake_speed;
    }

    fn sync_target_fps(mut self) -> Self {
        self.base.target_fps = self.snake_speed;
        self
    }
}

#[derive(Debug, Error)]
pub(crate) enum OptionsError {
    #[error("failed to read options file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse options file {path} at `{field}`: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn load_options_file(path: &Path) -> Result<SnakeOptions, OptionsError> {
    let raw = fs::read_to_string(path).map_err(|source| OptionsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_options_json(&raw).map_err(|(field, source)| OptionsError::Parse {
        path: path.to_path_buf(),
        field,
        source,
    })
}

fn parse_options_json(raw: &str) -> Result<SnakeOptions, (String, serde_json::Error)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SnakeOptions>(&mut deserializer) {
        Ok(options) => Ok(options.sync_target_fps()),
        Err(error) => {
            let field = error.path().to_string();
            Err((field, error.into_inner()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_tie_tick_delay_to_snake_speed() {
        let options = SnakeOptions::default();

        assert_eq!(options.cell_size().expect("cell size"), 20);
        assert_eq!(options.pickups_count().expect("pickups"), 10);
        assert_eq!(options.starting_snake_length, 4);
        assert_eq!(options.target_fps(), 3.0);
        assert_eq!(options.snake_color.to_string(), "#ccff11");
        assert_eq!(options.background_color.to_string(), "#663300");
        assert!(!options.is_paused());
    }

    #[test]
    fn increase_speed_updates_target_fps() {
        let mut options = SnakeOptions::default();

        options.increase_speed();
        options.increase_speed();

        assert_eq!(options.snake_speed, 5.0);
        assert_eq!(options.target_fps(), 5.0);
    }

    #[test]
    fn zero_values_are_reported_as_missing() {
        let options = SnakeOptions {
            cell_size: 0,
            pickups_count: 0,
            ..SnakeOptions::default()
        };

        assert!(matches!(
            options.cell_size(),
            Err(GameError::MissingOption { name: "cell_size" })
        ));
        assert!(matches!(
            options.pickups_count(),
            Err(GameError::MissingOption {
                name: "pickups_count"
            })
        ));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r##"{{ "cell_size": 10, "snake_speed": 5, "snake_color": "#112233" }}"##
        )
        .expect("write options");

        let options = load_options_file(file.path()).expect("options");

        assert_eq!(options.cell_size, 10);
        assert_eq!(options.snake_speed, 5.0);
        assert_eq!(options.target_fps(), 5.0);
        assert_eq!(options.snake_color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(options.pickups_count, 10);
    }

    #[test]
    fn bad_colour_reports_field_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "head_color": "green" }}"#).expect("write options");

        let error = load_options_file(file.path()).expect_err("invalid colour");

        match error {
            OptionsError::Parse { field, .. } => assert_eq!(field, "head_color"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = parse_options_json(r#"{ "snake_sped": 4 }"#).expect_err("unknown field");
        assert!(error.1.to_string().contains("snake_sped"));
    }

    #[test]
    fn tick_rate_comes_from_snake_speed_not_the_file() {
        for raw in [r#"{ "target_fps": 9 }"#, r#"{ "base": {} }"#] {
            assert!(parse_options_json(raw).is_err(), "{raw} should be rejected");
        }

        let options = parse_options_json(r#"{ "snake_speed": 7 }"#).expect("options");
        assert_eq!(options.target_fps(), 7.0);
        assert!(!options.is_paused());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error =
            load_options_file(&dir.path().join("absent.json")).expect_err("missing file");

        assert!(matches!(error, OptionsError::Read { .. }));
    }
}
