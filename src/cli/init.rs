use super::config::GateConfig;
use super::{open_engine, persist};
use multisig_gate::gateway::Vertical;
use multisig_gate::identity::MemberId;
use multisig_gate::SetupParams;

/// Run the one-time setup
///
/// The membership floor comes from `[engine] membership_floor`. Fails if
/// the state file already holds an initialized engine.
pub fn execute(
    config: &GateConfig,
    parameter_members: Vec<MemberId>,
    flags_members: Vec<MemberId>,
    admin: MemberId,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config)?;
    engine.initialize(
        SetupParams::new(parameter_members, flags_members, admin)
            .with_floor(config.engine.membership_floor),
    )?;
    persist(config, &engine)?;

    println!("✅ Engine initialized");
    for vertical in Vertical::ALL {
        println!(
            "  {}: {} members, threshold {}",
            vertical,
            engine.member_count(vertical)?,
            engine.threshold(vertical)?
        );
    }
    println!("  Admin: {}", engine.admin()?);
    println!("  State: {}", config.state.path.display());

    Ok(())
}
