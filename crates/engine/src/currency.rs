//! Country-name to currency-symbol resolution.
//!
//! The profile "country" field is free text, so resolution is best effort:
//! an exact case-insensitive name match first, then a fuzzy fallback over
//! the reference table taking the closest candidate. A miss yields `None`
//! and callers skip the currency annotation.

/// One row of the static country reference table.
struct CountryRecord {
    name: &'static str,
    alpha2: &'static str,
    currency: &'static str,
    symbol: &'static str,
}

static COUNTRIES: &[CountryRecord] = &[
    CountryRecord { name: "Argentina", alpha2: "AR", currency: "ARS", symbol: "$" },
    CountryRecord { name: "Australia", alpha2: "AU", currency: "AUD", symbol: "A$" },
    CountryRecord { name: "Austria", alpha2: "AT", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Bangladesh", alpha2: "BD", currency: "BDT", symbol: "৳" },
    CountryRecord { name: "Belgium", alpha2: "BE", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Brazil", alpha2: "BR", currency: "BRL", symbol: "R$" },
    CountryRecord { name: "Canada", alpha2: "CA", currency: "CAD", symbol: "C$" },
    CountryRecord { name: "Chile", alpha2: "CL", currency: "CLP", symbol: "$" },
    CountryRecord { name: "China", alpha2: "CN", currency: "CNY", symbol: "¥" },
    CountryRecord { name: "Colombia", alpha2: "CO", currency: "COP", symbol: "$" },
    CountryRecord { name: "Croatia", alpha2: "HR", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Czechia", alpha2: "CZ", currency: "CZK", symbol: "Kč" },
    CountryRecord { name: "Denmark", alpha2: "DK", currency: "DKK", symbol: "kr" },
    CountryRecord { name: "Egypt", alpha2: "EG", currency: "EGP", symbol: "E£" },
    CountryRecord { name: "Finland", alpha2: "FI", currency: "EUR", symbol: "€" },
    CountryRecord { name: "France", alpha2: "FR", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Germany", alpha2: "DE", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Greece", alpha2: "GR", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Hungary", alpha2: "HU", currency: "HUF", symbol: "Ft" },
    CountryRecord { name: "India", alpha2: "IN", currency: "INR", symbol: "₹" },
    CountryRecord { name: "Indonesia", alpha2: "ID", currency: "IDR", symbol: "Rp" },
    CountryRecord { name: "Ireland", alpha2: "IE", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Israel", alpha2: "IL", currency: "ILS", symbol: "₪" },
    CountryRecord { name: "Italy", alpha2: "IT", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Japan", alpha2: "JP", currency: "JPY", symbol: "¥" },
    CountryRecord { name: "Kenya", alpha2: "KE", currency: "KES", symbol: "KSh" },
    CountryRecord { name: "Malaysia", alpha2: "MY", currency: "MYR", symbol: "RM" },
    CountryRecord { name: "Mexico", alpha2: "MX", currency: "MXN", symbol: "$" },
    CountryRecord { name: "Netherlands", alpha2: "NL", currency: "EUR", symbol: "€" },
    CountryRecord { name: "New Zealand", alpha2: "NZ", currency: "NZD", symbol: "NZ$" },
    CountryRecord { name: "Nigeria", alpha2: "NG", currency: "NGN", symbol: "₦" },
    CountryRecord { name: "Norway", alpha2: "NO", currency: "NOK", symbol: "kr" },
    CountryRecord { name: "Pakistan", alpha2: "PK", currency: "PKR", symbol: "₨" },
    CountryRecord { name: "Philippines", alpha2: "PH", currency: "PHP", symbol: "₱" },
    CountryRecord { name: "Poland", alpha2: "PL", currency: "PLN", symbol: "zł" },
    CountryRecord { name: "Portugal", alpha2: "PT", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Romania", alpha2: "RO", currency: "RON", symbol: "lei" },
    CountryRecord { name: "Singapore", alpha2: "SG", currency: "SGD", symbol: "S$" },
    CountryRecord { name: "South Africa", alpha2: "ZA", currency: "ZAR", symbol: "R" },
    CountryRecord { name: "South Korea", alpha2: "KR", currency: "KRW", symbol: "₩" },
    CountryRecord { name: "Spain", alpha2: "ES", currency: "EUR", symbol: "€" },
    CountryRecord { name: "Sri Lanka", alpha2: "LK", currency: "LKR", symbol: "Rs" },
    CountryRecord { name: "Sweden", alpha2: "SE", currency: "SEK", symbol: "kr" },
    CountryRecord { name: "Switzerland", alpha2: "CH", currency: "CHF", symbol: "CHF" },
    CountryRecord { name: "Thailand", alpha2: "TH", currency: "THB", symbol: "฿" },
    CountryRecord { name: "Turkey", alpha2: "TR", currency: "TRY", symbol: "₺" },
    CountryRecord { name: "United Arab Emirates", alpha2: "AE", currency: "AED", symbol: "د.إ" },
    CountryRecord { name: "United Kingdom", alpha2: "GB", currency: "GBP", symbol: "£" },
    CountryRecord { name: "United States", alpha2: "US", currency: "USD", symbol: "$" },
    CountryRecord { name: "Vietnam", alpha2: "VN", currency: "VND", symbol: "₫" },
];

/// Resolve a free-text country name to its principal currency symbol.
#[must_use]
pub fn currency_symbol(country: &str) -> Option<&'static str> {
    find_country(country).map(|record| record.symbol)
}

/// Resolve a free-text country name to its principal currency code.
#[must_use]
pub fn currency_code(country: &str) -> Option<&'static str> {
    find_country(country).map(|record| record.currency)
}

/// Resolve a free-text country name to its alpha-2 code.
#[must_use]
pub fn country_code(country: &str) -> Option<&'static str> {
    find_country(country).map(|record| record.alpha2)
}

fn find_country(country: &str) -> Option<&'static CountryRecord> {
    let needle = country.trim();
    if needle.is_empty() {
        return None;
    }
    let lowered = needle.to_lowercase();

    if let Some(record) = COUNTRIES
        .iter()
        .find(|record| record.name.to_lowercase() == lowered)
    {
        return Some(record);
    }

    // Fuzzy fallback for slight mismatches ("Untied States", "Veitnam").
    let threshold = similarity_threshold(&lowered);
    let mut best: Option<(usize, &CountryRecord)> = None;
    for record in COUNTRIES {
        let distance = levenshtein(&lowered, &record.name.to_lowercase());
        if distance > threshold {
            continue;
        }
        let replace = match &best {
            None => true,
            Some((best_distance, _)) => distance < *best_distance,
        };
        if replace {
            best = Some((distance, record));
        }
    }
    best.map(|(_, record)| record)
}

/// Format an amount for display behind a currency symbol, grouping the
/// integer part in thousands: `("€", 1234.5)` becomes `€1,234.50`.
#[must_use]
pub fn format_amount(symbol: &str, amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let (units, fraction) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction:02}")
}

fn similarity_threshold(input: &str) -> usize {
    let len = input.chars().count();
    if len <= 6 { 1 } else { 2 }
}

fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut costs: Vec<usize> = (0..=right.len()).collect();

    for (i, left_char) in left.iter().enumerate() {
        let mut last_cost = i;
        costs[0] = i + 1;
        for (j, right_char) in right.iter().enumerate() {
            let next_cost = costs[j + 1];
            let mut cost = if left_char == right_char {
                last_cost
            } else {
                last_cost + 1
            };
            cost = cost.min(costs[j] + 1).min(next_cost + 1);
            costs[j + 1] = cost;
            last_cost = next_cost;
        }
    }

    costs[right.len()]
}
