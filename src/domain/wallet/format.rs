//! Display formatting for addresses, balances and chain ids

use alloy_primitives::U256;

/// Wei per displayed unit at four decimal places (1e14)
const WEI_PER_DISPLAY_UNIT: u64 = 100_000_000_000_000;
const DISPLAY_UNITS_PER_ETH: u64 = 10_000;

/// Shorten an address to `0x1234...abcd`
///
/// Empty input stays empty. Inputs shorter than ten characters still get
/// the head/tail treatment, the two halves simply overlap.
pub fn format_address(account: &str) -> String {
    if account.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = account.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}...{tail}")
}

/// Render a wei amount as ether with exactly four decimals (half-up)
pub fn format_balance(wei: U256) -> String {
    let half = U256::from(WEI_PER_DISPLAY_UNIT / 2);
    let units = wei.saturating_add(half) / U256::from(WEI_PER_DISPLAY_UNIT);
    let per_eth = U256::from(DISPLAY_UNITS_PER_ETH);
    let whole = units / per_eth;
    let frac = (units % per_eth).to::<u64>();
    format!("{whole}.{frac:04}")
}

/// Chain id in the `0x`-prefixed lowercase form wallets emit
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{chain_id:x}")
}
