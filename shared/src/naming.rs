//! Configuration naming.
//!
//! Configuration names double as file names, so they are stripped of
//! characters that common filesystems reject. Names of the form
//! `"Title (Variant)"` also yield a base name shared by all variants.

/// Turn a configuration name into a filesystem-safe name.
///
/// - `:` becomes `" - "`
/// - `*`, `/` and `\` become `-`
/// - `?` is removed
/// - `"` becomes `'`
/// - runs of spaces collapse to one space
/// - trailing dots and surrounding whitespace are removed
pub fn create_fs_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        match c {
            ':' => result.push_str(" - "),
            '*' | '/' | '\\' => result.push('-'),
            '?' => {}
            '"' => result.push('\''),
            _ => result.push(c),
        }
    }

    let mut collapsed = String::with_capacity(result.len());
    let mut previous_space = false;
    for c in result.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        collapsed.push(c);
    }

    collapsed.trim_end_matches('.').trim().to_string()
}

/// Base name used to group related configurations.
///
/// Everything from the first `(` onwards is dropped, so
/// `"Turrican II - Part 1 (AGA)"` and `"Turrican II - Part 1 (OCS)"` share the
/// base `"Turrican II - Part 1"`.
pub fn config_base_name(config_name: &str) -> String {
    match config_name.split_once('(') {
        Some((base, _)) => base.trim().to_string(),
        None => config_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_becomes_dash() {
        assert_eq!(
            create_fs_name("Turrican II: Part 1 (AGA)"),
            "Turrican II - Part 1 (AGA)"
        );
    }

    #[test]
    fn test_base_name_of_variant() {
        let name = create_fs_name("Turrican II: Part 1 (AGA)");
        assert_eq!(config_base_name(&name), "Turrican II - Part 1");
    }

    #[test]
    fn test_base_name_without_parenthesis() {
        assert_eq!(config_base_name("Lemmings"), "Lemmings");
    }

    #[test]
    fn test_hostile_characters() {
        assert_eq!(create_fs_name("A/B\\C*D"), "A-B-C-D");
        assert_eq!(create_fs_name("Who?"), "Who");
        assert_eq!(create_fs_name("Say \"Hi\""), "Say 'Hi'");
    }

    #[test]
    fn test_collapses_spaces_and_trims_dots() {
        assert_eq!(create_fs_name("  Many     spaces here..."), "Many spaces here");
        assert_eq!(create_fs_name("Dots..."), "Dots");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(create_fs_name(""), "");
        assert_eq!(config_base_name(""), "");
    }
}
