// Human-readable labels for scores, rates and prices.

use crate::domain::model::MarketTrend;

pub fn walk_label(score: u8) -> &'static str {
    match score {
        90.. => "Walker's Paradise",
        70..=89 => "Very Walkable",
        50..=69 => "Somewhat Walkable",
        _ => "Car-Dependent",
    }
}

pub fn transit_label(score: u8) -> &'static str {
    match score {
        90.. => "Excellent Transit",
        70..=89 => "Good Transit",
        50..=69 => "Some Transit",
        _ => "Minimal Transit",
    }
}

pub fn bike_label(score: u8) -> &'static str {
    match score {
        90.. => "Biker's Paradise",
        70..=89 => "Very Bikeable",
        50..=69 => "Bikeable",
        25..=49 => "Somewhat Bikeable",
        _ => "Not Bikeable",
    }
}

pub fn safety_label(score: u8) -> &'static str {
    match score {
        80.. => "Very Safe",
        60..=79 => "Generally Safe",
        40..=59 => "Moderately Safe",
        20..=39 => "Use Caution",
        _ => "High Crime Area",
    }
}

/// 以每十萬人犯罪數分級
pub fn crime_rate_label(rate_per_100k: u32) -> &'static str {
    match rate_per_100k {
        0..=1499 => "Very Low Crime",
        1500..=2499 => "Low Crime",
        2500..=3499 => "Moderate Crime",
        3500..=4999 => "High Crime",
        _ => "Very High Crime",
    }
}

pub fn market_trend_label(trend: MarketTrend) -> &'static str {
    match trend {
        MarketTrend::Seller => "Seller's Market",
        MarketTrend::Buyer => "Buyer's Market",
        MarketTrend::Balanced => "Balanced Market",
    }
}

/// `$1.3M`, `$525K`, `$950`
pub fn format_price(price: u64) -> String {
    if price >= 1_000_000 {
        format!("${:.1}M", price as f64 / 1_000_000.0)
    } else if price >= 1_000 {
        format!("${:.0}K", price as f64 / 1_000.0)
    } else {
        format!("${}", price)
    }
}

/// Thousands separators: `128500` -> `128,500`.
pub fn with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
