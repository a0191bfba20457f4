//! Container identity resolution: matches configured container specifiers
//! against the live container list and assigns cgroup slice identities.

use crate::models::ContainerRecord;

/// Wildcard specifier selecting every running container.
pub const ALL_CONTAINERS: &str = "*";

/// A specifier reads as a hex container-id prefix when it parses as a
/// base-16 integer of any length.
fn is_id_specifier(spec: &str) -> bool {
    !spec.is_empty() && spec.chars().all(|c| c.is_ascii_hexdigit())
}

/// Names from the container API carry a leading `/`; configured names may
/// not.
fn normalize_name(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// Match one specifier against a container. Id-prefix matching takes
/// precedence whenever the specifier is hex; names require an exact match.
pub fn specifier_matches(spec: &str, container_id: &str, names: &[String]) -> bool {
    if is_id_specifier(spec) {
        container_id.starts_with(spec)
    } else {
        let wanted = normalize_name(spec);
        names.iter().any(|name| normalize_name(name) == wanted)
    }
}

/// Derived slice path for a container's docker scope cgroup.
pub fn slice_id_for(container_id: &str) -> String {
    format!("/system.slice/docker-{container_id}.scope")
}

/// Assign slice ids to the records matched by the configured targets.
/// Unmatched records keep `slice_id` unset and are never emitted. The pass
/// recomputes every assignment from scratch, so repeated runs agree.
pub fn assign_slice_ids(records: &mut [ContainerRecord], targets: &[String]) {
    let all_containers = targets.iter().any(|t| t == ALL_CONTAINERS);

    for record in records.iter_mut() {
        record.slice_id = None;
        let slice_id = slice_id_for(&record.id);
        if all_containers {
            record.slice_id = Some(slice_id);
            continue;
        }
        for target in targets {
            if specifier_matches(target, &record.id, &record.names) {
                record.slice_id = Some(slice_id);
                // explicit container name/id only, no substrings
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "deadbeef00112233445566778899aabbccddeeff00112233445566778899aabb";
    const ID_B: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn record(id: &str, names: &[&str]) -> ContainerRecord {
        ContainerRecord {
            id: id.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            slice_id: None,
        }
    }

    fn targets(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_id_prefix_match() {
        let mut records = vec![record(ID_A, &["/web"]), record(ID_B, &["/db"])];
        assign_slice_ids(&mut records, &targets(&["deadbeef"]));

        assert_eq!(records[0].slice_id, Some(slice_id_for(ID_A)));
        assert_eq!(records[1].slice_id, None);
    }

    #[test]
    fn test_hex_specifier_never_matches_as_name() {
        // A container literally named "deadbeef" whose id starts elsewhere:
        // the specifier still reads as an id prefix and must not match.
        let mut records = vec![record(ID_B, &["/deadbeef"])];
        assign_slice_ids(&mut records, &targets(&["deadbeef"]));
        assert_eq!(records[0].slice_id, None);
    }

    #[test]
    fn test_name_match_normalizes_leading_slash() {
        let mut records = vec![record(ID_A, &["/web"])];
        assign_slice_ids(&mut records, &targets(&["web"]));
        assert_eq!(records[0].slice_id, Some(slice_id_for(ID_A)));
    }

    #[test]
    fn test_name_match_is_exact_not_substring() {
        let mut records = vec![record(ID_A, &["/webserver"])];
        assign_slice_ids(&mut records, &targets(&["web"]));
        assert_eq!(records[0].slice_id, None);
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let mut records = vec![record(ID_A, &["/web"]), record(ID_B, &["/db"])];
        assign_slice_ids(&mut records, &targets(&["*"]));
        assert!(records.iter().all(|r| r.slice_id.is_some()));
    }

    #[test]
    fn test_unmatched_records_keep_no_slice_id() {
        let mut records = vec![record(ID_A, &["/web"])];
        assign_slice_ids(&mut records, &targets(&["db"]));
        assert_eq!(records[0].slice_id, None);
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let mut first = vec![record(ID_A, &["/web"]), record(ID_B, &["/db"])];
        let specs = targets(&["web", "0123"]);
        assign_slice_ids(&mut first, &specs);
        let mut second = first.clone();
        assign_slice_ids(&mut second, &specs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_multiple_matching_specifiers_assign_once() {
        let mut records = vec![record(ID_A, &["/web"])];
        assign_slice_ids(&mut records, &targets(&["web", "deadbeef"]));
        assert_eq!(records[0].slice_id, Some(slice_id_for(ID_A)));
    }
}
