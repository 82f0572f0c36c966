/// Display version information
pub fn execute() {
    println!("multisig-gate {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for the multisig voting gate");
}
