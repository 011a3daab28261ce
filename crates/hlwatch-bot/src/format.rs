//! Telegram message formatting.
//!
//! All user-facing Markdown text lives here: command responses,
//! position-change alerts and periodic digests.

use hlwatch_core::{Address, Position, Snapshot};
use hlwatch_diff::{CloseOutcome, PositionEvent, ResizeDirection};
use rust_decimal::Decimal;

/// Format a dollar amount: two decimals, thousands separators.
fn usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Insert thousands separators into a digit string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a size magnitude with four decimals.
fn size(value: Decimal) -> String {
    format!("{:.4}", value.abs())
}

/// Format a leverage multiplier as "Nx", trailing zeros dropped.
fn leverage(value: Decimal) -> String {
    format!("{}x", value.normalize())
}

/// Liquidation price line fragment: formatted price or "N/A".
fn liquidation(price: Decimal) -> String {
    if price > Decimal::ZERO {
        format!("`{}`", usd(price))
    } else {
        "N/A".to_string()
    }
}

/// /start and /help response.
pub fn help_text() -> String {
    "🤖 *Hyperliquid Position Monitor Bot*\n\n\
     Track any trader's positions and get instant alerts!\n\n\
     *Commands:*\n\
     `/add 0x...` - Add address to monitor\n\
     `/remove 0x...` - Stop monitoring address\n\
     `/list` - Show your monitored addresses\n\
     `/status` - Check positions now\n\
     `/help` - Show this message\n\n\
     Example:\n\
     `/add 0x1234567890abcdef1234567890abcdef12345678`\n\n\
     *You'll get alerts with:*\n\
     • Position side (LONG/SHORT)\n\
     • Leverage used (e.g. 5x, 10x)\n\
     • Entry price & size\n\
     • Liquidation price\n\
     • Real-time PnL"
        .to_string()
}

pub fn invalid_address() -> String {
    "❌ Invalid address format. Must be 42 characters starting with 0x".to_string()
}

pub fn usage(command: &str) -> String {
    format!("❌ Usage: `/{command} 0x1234...`")
}

pub fn unknown_command() -> String {
    "❌ Unknown command. Send /help for available commands.".to_string()
}

pub fn already_watching(address: &Address) -> String {
    format!("⚠️ Already monitoring:\n`{address}`")
}

pub fn now_monitoring(address: &Address) -> String {
    format!(
        "✅ *Now Monitoring*\n\
         Address: `{address}`\n\
         Short: `{}`\n\n\
         You'll receive alerts for:\n\
         • New positions opened (with leverage)\n\
         • Positions closed (with final PnL)\n\
         • Material position size changes\n\
         • Periodic position summaries",
        address.short()
    )
}

pub fn not_watching(address: &str) -> String {
    format!("❌ Not monitoring this address:\n`{address}`")
}

pub fn stopped_monitoring(address: &Address) -> String {
    format!("✅ Stopped monitoring:\n`{}`", address.short())
}

pub fn empty_watch_list() -> String {
    "📭 You're not monitoring any addresses.\n\nUse `/add 0x...` to start!".to_string()
}

/// /list response: one numbered line per address with its open
/// position count.
pub fn watch_list(entries: &[(Address, usize)]) -> String {
    let mut text = "📋 *Your Monitored Addresses:*\n\n".to_string();
    for (i, (address, open)) in entries.iter().enumerate() {
        text.push_str(&format!(
            "{}. `{}`\n   Open positions: {open}\n\n",
            i + 1,
            address.short()
        ));
    }
    text.push_str(&format!("Total: {} addresses", entries.len()));
    text
}

fn position_lines(pos: &Position) -> String {
    let pnl_emoji = if pos.unrealized_pnl >= Decimal::ZERO {
        "🟢"
    } else {
        "🔴"
    };
    format!(
        "{pnl_emoji} *{}/USD* {} *{}*\n\
         Size: `{}` {} | Entry: `{}`\n\
         PnL: `{}` | Liq: {}\n\n",
        pos.instrument,
        pos.side(),
        leverage(pos.leverage),
        size(pos.size),
        pos.instrument,
        usd(pos.entry_price),
        usd(pos.unrealized_pnl),
        liquidation(pos.liquidation_price),
    )
}

/// Per-address block for /status.
pub fn status_block(address: &Address, snapshot: &Snapshot) -> String {
    if snapshot.is_empty() {
        return format!("📊 `{}`\n\nNo open positions", address.short());
    }
    let mut text = format!(
        "📊 `{}`\nOpen: {} | Total PnL: {}\n\n",
        address.short(),
        snapshot.len(),
        usd(snapshot.total_unrealized_pnl()),
    );
    for (_, pos) in snapshot.iter() {
        text.push_str(&position_lines(pos));
    }
    text.trim_end().to_string()
}

/// Listing of current positions sent right after /add.
pub fn current_positions(snapshot: &Snapshot) -> String {
    let mut text = "📊 *Current Positions:*\n\n".to_string();
    for (_, pos) in snapshot.iter() {
        text.push_str(&position_lines(pos));
    }
    text.trim_end().to_string()
}

/// Alert text for one notification event.
pub fn event_message(address: &Address, event: &PositionEvent) -> String {
    match event {
        PositionEvent::Opened {
            instrument,
            side,
            leverage: lev,
            size: sz,
            entry_price,
            notional,
            liquidation_price,
        } => format!(
            "🚨 *NEW POSITION OPENED*\n\
             Address: `{}`\n\n\
             📈 *{instrument}/USD* - {side}\n\
             ⚡ *Leverage: {}*\n\n\
             Size: `{}` {instrument}\n\
             Value: `{}`\n\
             Entry: `{}`\n\
             💀 Liq: {}",
            address.short(),
            leverage(*lev),
            size(*sz),
            usd(*notional),
            usd(*entry_price),
            liquidation(*liquidation_price),
        ),
        PositionEvent::Closed {
            instrument,
            side,
            leverage: lev,
            size: sz,
            entry_price,
            final_pnl,
            outcome,
        } => {
            let (emoji, label) = match outcome {
                CloseOutcome::Profit => ("💰", "PROFIT"),
                CloseOutcome::Loss => ("💸", "LOSS"),
            };
            format!(
                "{emoji} *POSITION CLOSED - {label}*\n\
                 Address: `{}`\n\n\
                 📉 *{instrument}/USD* - {side}\n\
                 ⚡ Leverage: {}\n\n\
                 Entry: `{}`\n\
                 Size: `{}` {instrument}\n\
                 Final PnL: `{}`",
                address.short(),
                leverage(*lev),
                usd(*entry_price),
                size(*sz),
                usd(*final_pnl),
            )
        }
        PositionEvent::Resized {
            instrument,
            side,
            leverage: lev,
            direction,
            old_size,
            new_size,
            change_pct,
            unrealized_pnl,
        } => {
            let action = match direction {
                ResizeDirection::Increased => "INCREASED",
                ResizeDirection::Decreased => "DECREASED",
            };
            format!(
                "⚠️ *POSITION {action}*\n\
                 Address: `{}`\n\n\
                 *{instrument}/USD* {side} {}\n\
                 Old Size: `{}` → New Size: `{}`\n\
                 Change: `{:.1}%`\n\
                 Current PnL: `{}`",
                address.short(),
                leverage(*lev),
                size(*old_size),
                size(*new_size),
                change_pct,
                usd(*unrealized_pnl),
            )
        }
    }
}

/// Periodic digest for one address.
pub fn summary_digest(address: &Address, snapshot: &Snapshot) -> String {
    if snapshot.is_empty() {
        return format!(
            "📅 *Position Summary*\n`{}`\n\nNo open positions",
            address.short()
        );
    }
    let total_pnl = snapshot.total_unrealized_pnl();
    let trend = if total_pnl >= Decimal::ZERO { "📈" } else { "📉" };
    let mut text = format!(
        "📅 *Position Summary*\n`{}`\n\n\
         {trend} Open: {} | Total PnL: *{}*\n\n",
        address.short(),
        snapshot.len(),
        usd(total_pnl),
    );
    for (_, pos) in snapshot.iter() {
        text.push_str(&position_lines(pos));
    }
    text.trim_end().to_string()
}
