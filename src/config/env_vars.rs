/// Expand Unix-style environment variables (`$VAR` and `${VAR}`).
///
/// Unset variables expand to an empty string, as in a POSIX shell.
pub fn expand_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if braced && next == '}' {
                break;
            }
            if !braced && !(next.is_ascii_alphanumeric() || next == '_') {
                break;
            }
            name.push(next);
            chars.next();
        }

        if braced {
            if chars.peek() == Some(&'}') {
                chars.next();
            } else {
                // No closing brace, keep the text as written
                result.push_str("${");
                result.push_str(&name);
                continue;
            }
        }

        if name.is_empty() {
            result.push('$');
            if braced {
                result.push_str("{}");
            }
            continue;
        }

        result.push_str(&std::env::var(&name).unwrap_or_default());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(expand_env_vars("/dev/ttyUSB0"), "/dev/ttyUSB0");
    }

    #[test]
    fn test_braced_and_bare() {
        std::env::set_var("SM_ENV_TEST_A", "alpha");
        assert_eq!(expand_env_vars("/x/${SM_ENV_TEST_A}/y"), "/x/alpha/y");
        assert_eq!(expand_env_vars("/x/$SM_ENV_TEST_A/y"), "/x/alpha/y");
        std::env::remove_var("SM_ENV_TEST_A");
    }

    #[test]
    fn test_unset_expands_empty() {
        assert_eq!(expand_env_vars("/x/${SM_ENV_TEST_UNSET_VAR}"), "/x/");
    }

    #[test]
    fn test_lone_dollar_and_unclosed_brace() {
        assert_eq!(expand_env_vars("cost$"), "cost$");
        assert_eq!(expand_env_vars("/x/${OPEN"), "/x/${OPEN");
    }
}
