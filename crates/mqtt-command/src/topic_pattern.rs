//! Validates and matches `:deletetopic` patterns against spec §4.3's
//! wildcard rule: `+` only as a full level, `#` only as a trailing final
//! level.

/// Whether `pattern` is a well-formed `:deletetopic` argument: an exact
/// topic, or a wildcard pattern with `+` only as a full level and `#` only
/// as a trailing final level.
#[must_use]
pub fn is_valid_delete_pattern(pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len() - 1;
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            return false;
        }
        if *segment == "#" {
            if i != last {
                return false;
            }
            continue;
        }
        if segment.contains('#') {
            return false;
        }
        if *segment == "+" {
            continue;
        }
        if segment.contains('+') {
            return false;
        }
    }
    true
}

/// Whether `topic` matches `pattern` under MQTT wildcard semantics: `+`
/// matches exactly one level, a trailing `#` matches that level and every
/// level below it. `pattern` must already satisfy [`is_valid_delete_pattern`];
/// callers that skip that check get a conservative `false` on malformed
/// input rather than a panic.
#[must_use]
pub fn matches_topic_pattern(pattern: &str, topic: &str) -> bool {
    if !is_valid_delete_pattern(pattern) {
        return false;
    }
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let topic_segments: Vec<&str> = topic.split('/').collect();

    for (i, p) in pattern_segments.iter().enumerate() {
        if *p == "#" {
            return true;
        }
        let Some(t) = topic_segments.get(i) else {
            return false;
        };
        if *p != "+" && p != t {
            return false;
        }
    }
    pattern_segments.len() == topic_segments.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_topic_is_valid() {
        assert!(is_valid_delete_pattern("sensors/kitchen/temp"));
    }

    #[test]
    fn plus_as_full_level_is_valid() {
        assert!(is_valid_delete_pattern("sensors/+/temp"));
    }

    #[test]
    fn hash_as_trailing_level_is_valid() {
        assert!(is_valid_delete_pattern("sensors/#"));
    }

    #[test]
    fn hash_not_trailing_is_invalid() {
        assert!(!is_valid_delete_pattern("sensors/#/temp"));
    }

    #[test]
    fn plus_mixed_into_segment_is_invalid() {
        assert!(!is_valid_delete_pattern("sensors/kit+chen/temp"));
    }

    #[test]
    fn empty_segment_is_invalid() {
        assert!(!is_valid_delete_pattern("sensors//temp"));
    }

    #[test]
    fn empty_pattern_is_invalid() {
        assert!(!is_valid_delete_pattern(""));
    }

    #[test]
    fn exact_pattern_matches_only_itself() {
        assert!(matches_topic_pattern("sensors/kitchen/temp", "sensors/kitchen/temp"));
        assert!(!matches_topic_pattern("sensors/kitchen/temp", "sensors/kitchen/humidity"));
    }

    #[test]
    fn plus_matches_exactly_one_level() {
        assert!(matches_topic_pattern("sensors/+/temp", "sensors/kitchen/temp"));
        assert!(!matches_topic_pattern("sensors/+/temp", "sensors/kitchen/room/temp"));
    }

    #[test]
    fn trailing_hash_matches_level_and_below() {
        assert!(matches_topic_pattern("sensors/#", "sensors"));
        assert!(matches_topic_pattern("sensors/#", "sensors/kitchen"));
        assert!(matches_topic_pattern("sensors/#", "sensors/kitchen/temp"));
        assert!(!matches_topic_pattern("sensors/#", "other/kitchen"));
    }

    #[test]
    fn malformed_pattern_never_matches() {
        assert!(!matches_topic_pattern("sensors/#/temp", "sensors/anything/temp"));
    }
}
