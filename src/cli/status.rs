//! Read-only commands: engine status and the notification log.

use super::config::GateConfig;
use super::open_engine;
use multisig_gate::gateway::{EventRecord, Notification, Vertical};
use multisig_gate::identity::MemberId;
use multisig_gate::store::LocalSettings;
use multisig_gate::Engine;
use serde::Serialize;
use std::error::Error;

#[derive(Debug, Serialize)]
struct StatusReport {
    ready: bool,
    admin: Option<MemberId>,
    groups: Vec<GroupStatus>,
    settings: SettingsStatus,
    events: usize,
}

#[derive(Debug, Serialize)]
struct GroupStatus {
    vertical: Vertical,
    members: Vec<MemberId>,
    threshold: usize,
    group_version: u64,
    membership_floor: usize,
    round_version: u64,
}

#[derive(Debug, Serialize)]
struct SettingsStatus {
    enabled: bool,
    max_parameter: Option<u64>,
    parameter: Option<u64>,
    flag_a: Option<bool>,
    flag_b: Option<bool>,
    applied: u64,
}

fn report(engine: &Engine<LocalSettings>) -> Result<StatusReport, Box<dyn Error>> {
    let settings = engine.service();
    let policy = settings.policy();
    let settings = SettingsStatus {
        enabled: policy.enabled,
        max_parameter: policy.max_parameter,
        parameter: settings.parameter,
        flag_a: settings.flags.map(|p| p.flag_a),
        flag_b: settings.flags.map(|p| p.flag_b),
        applied: settings.applied,
    };

    if !engine.is_ready() {
        return Ok(StatusReport {
            ready: false,
            admin: None,
            groups: Vec::new(),
            settings,
            events: 0,
        });
    }

    let mut groups = Vec::new();
    for vertical in Vertical::ALL {
        groups.push(GroupStatus {
            vertical,
            members: engine.members(vertical)?,
            threshold: engine.threshold(vertical)?,
            group_version: engine.group_version(vertical)?,
            membership_floor: engine.membership_floor(vertical)?,
            round_version: engine.round_version(vertical)?,
        });
    }

    Ok(StatusReport {
        ready: true,
        admin: Some(engine.admin()?),
        groups,
        settings,
        events: engine.events_since(0)?.len(),
    })
}

/// Show groups, thresholds, versions and the applied settings
pub fn execute(config: &GateConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let engine = open_engine(config)?;
    let report = report(&engine)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Multisig Gate Status");
    println!();
    if !report.ready {
        println!("❌ Not initialized (run `multisig-gate init`)");
        return Ok(());
    }

    if let Some(admin) = report.admin {
        println!("  Admin: {}", admin);
    }
    for group in &report.groups {
        println!();
        println!(
            "  [{}] {} members, threshold {}, floor {}",
            group.vertical,
            group.members.len(),
            group.threshold,
            group.membership_floor
        );
        println!(
            "  group version {}, round version {}",
            group.group_version, group.round_version
        );
        for member in &group.members {
            println!("    - {}", member);
        }
    }

    let settings = &report.settings;
    println!();
    println!(
        "  Service: {}",
        if settings.enabled { "enabled" } else { "disabled" }
    );
    match settings.parameter {
        Some(value) => println!("  Parameter: {}", value),
        None => println!("  Parameter: (never set)"),
    }
    match (settings.flag_a, settings.flag_b) {
        (Some(a), Some(b)) => println!("  Flags: ({}, {})", a, b),
        _ => println!("  Flags: (never set)"),
    }
    println!("  Notifications: {}", report.events);

    Ok(())
}

/// List notifications after sequence number `since`
pub fn events(config: &GateConfig, since: u64, json: bool) -> Result<(), Box<dyn Error>> {
    let engine = open_engine(config)?;
    for record in engine.events_since(since)? {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", describe(record));
        }
    }
    Ok(())
}

fn describe(record: &EventRecord) -> String {
    let text = match &record.notification {
        Notification::ParameterVoted { voter, value } => {
            format!("{} voted parameter {}", voter.short(), value)
        }
        Notification::ParameterResolved { value, response } => {
            format!("parameter {} resolved: {}", value, response)
        }
        Notification::FlagsVoted {
            voter,
            flag_a,
            flag_b,
        } => format!("{} voted flags ({}, {})", voter.short(), flag_a, flag_b),
        Notification::FlagsResolved {
            flag_a,
            flag_b,
            response,
        } => format!("flags ({}, {}) resolved: {}", flag_a, flag_b, response),
        Notification::MemberAddVoted {
            vertical,
            voter,
            candidate,
        } => format!(
            "{} voted to add {} to {}",
            voter.short(),
            candidate.short(),
            vertical
        ),
        Notification::MemberRemoveVoted {
            vertical,
            voter,
            member,
        } => format!(
            "{} voted to remove {} from {}",
            voter.short(),
            member.short(),
            vertical
        ),
        Notification::MemberAdded {
            vertical,
            member,
            group_version,
        } => format!(
            "{} added to {} (group version {})",
            member.short(),
            vertical,
            group_version
        ),
        Notification::MemberRemoved {
            vertical,
            member,
            group_version,
        } => format!(
            "{} removed from {} (group version {})",
            member.short(),
            vertical,
            group_version
        ),
    };
    format!("#{} [{}] {}", record.seq, record.recorded_at, text)
}
