use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// ASGS administrative level
///
/// SA3 regions nest inside SA4 regions, so only SA3 features carry a
/// parent code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Statistical Area Level 3 (fine)
    Sa3,
    /// Statistical Area Level 4 (coarse)
    Sa4,
}

impl Level {
    /// Column prefix used by the ASGS boundary files ("SA3", "SA4")
    pub fn code(&self) -> &'static str {
        match self {
            Level::Sa3 => "SA3",
            Level::Sa4 => "SA4",
        }
    }

    /// Lowercase stem for output file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            Level::Sa3 => "sa3",
            Level::Sa4 => "sa4",
        }
    }

    pub fn has_parent(&self) -> bool {
        matches!(self, Level::Sa3)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Sa3.code(), "SA3");
        assert_eq!(Level::Sa4.file_stem(), "sa4");
        assert_eq!(Level::Sa3.to_string(), "SA3");
    }

    #[test]
    fn test_only_fine_level_has_parent() {
        assert!(Level::Sa3.has_parent());
        assert!(!Level::Sa4.has_parent());
    }

    #[test]
    fn test_level_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: Level,
        }
        let w: Wrapper = toml::from_str(r#"level = "sa4""#).unwrap();
        assert_eq!(w.level, Level::Sa4);
    }
}
