//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};

use kioskhub_core::Target;

use crate::cli::TargetArgs;

/// Build a core target from `--device/--group/--ip`. Empty input yields
/// an empty target, which the engine rejects as invalid.
pub fn target(args: &TargetArgs) -> Target {
    Target {
        device_id: args.device,
        group_id: args.group,
        addresses: args.ips.clone(),
    }
}

/// Short relative age, e.g. `42s ago`.
pub fn ago(ts: Option<DateTime<Utc>>) -> String {
    let Some(ts) = ts else {
        return "never".into();
    };
    let secs = (Utc::now() - ts).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// `-` for empty strings.
pub fn or_dash(s: &str) -> String {
    if s.is_empty() { "-".into() } else { s.to_owned() }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn ages_pick_the_largest_unit() {
        assert_eq!(ago(None), "never");
        assert_eq!(ago(Some(Utc::now() - Duration::minutes(5))), "5m ago");
        assert_eq!(ago(Some(Utc::now() - Duration::days(2))), "2d ago");
    }

    #[test]
    fn target_keeps_every_selector() {
        let args = TargetArgs {
            device: Some(3),
            group: None,
            ips: vec!["10.0.0.9".into()],
        };
        let t = target(&args);
        assert_eq!(t.device_id, Some(3));
        assert_eq!(t.addresses, vec!["10.0.0.9".to_owned()]);
    }
}
