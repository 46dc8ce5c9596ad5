//! Account mapping commands

use adscope_core::AccountResolver;
use anyhow::Result;

pub fn cmd_accounts(resolver: &AccountResolver) -> Result<()> {
    let accounts = resolver.accounts();
    if accounts.is_empty() {
        println!(
            "No named accounts (mapping file: {})",
            resolver.mapping_path().display()
        );
        println!("Numeric customer IDs can still be used directly.");
        return Ok(());
    }

    let width = accounts.iter().map(|a| a.name.len()).max().unwrap_or(0);
    println!("{:<width$}  CUSTOMER ID", "NAME", width = width);
    for account in &accounts {
        println!(
            "{:<width$}  {}",
            account.name,
            account.customer_id,
            width = width
        );
    }
    Ok(())
}

pub fn cmd_resolve(resolver: &AccountResolver, account: &str) -> Result<()> {
    let customer_id = resolver.resolve(account)?;
    println!("{}", customer_id);
    Ok(())
}
