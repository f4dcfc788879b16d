//! Option ranking and quote recommendations.

use hikyaku_core::DataSource;

use crate::models::{CorrectionSummary, Recommendation, ShippingOption};

/// Sort options by price ascending and derive the recommendation notes.
///
/// The sort is stable, so options with equal prices keep their lookup order
/// (database rows before the estimate). Notes are built in a fixed order:
///
/// 1. when no options exist, a single "no options" note (nothing else);
/// 2. which correction profile was applied, when a summary is supplied;
/// 3. the cheapest option;
/// 4. the first option priced from the rate table, when there is one.
#[must_use]
pub fn rank_and_recommend(
    mut options: Vec<ShippingOption>,
    correction: Option<&CorrectionSummary>,
) -> (Vec<ShippingOption>, Vec<Recommendation>) {
    options.sort_by_key(|option| option.price_jpy);

    let mut recommendations = Vec::new();

    let Some(cheapest) = options.first() else {
        recommendations.push(Recommendation {
            title: "No options".to_string(),
            message: "No shipping options are available for this destination and weight."
                .to_string(),
        });
        return (options, recommendations);
    };

    if let Some(summary) = correction {
        recommendations.push(Recommendation {
            title: "Correction applied".to_string(),
            message: format!(
                "Measurements corrected with profile \"{}\" (weight {}).",
                summary.profile_name, summary.weight_change
            ),
        });
    }

    recommendations.push(Recommendation {
        title: "Cheapest option".to_string(),
        message: format!(
            "{} is the lowest cost at ¥{} ({} days).",
            cheapest.service_name, cheapest.price_jpy, cheapest.delivery_days
        ),
    });

    if let Some(db_option) = options.iter().find(|o| o.source == DataSource::Database) {
        recommendations.push(Recommendation {
            title: "Live rate".to_string(),
            message: format!(
                "{} is priced from the current rate table at ¥{}.",
                db_option.service_name, db_option.price_jpy
            ),
        });
    }

    (options, recommendations)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hikyaku_core::{ProfileId, ServiceType, Yen};

    fn option(name: &str, price: i64, source: DataSource) -> ShippingOption {
        let price_jpy = Yen::new(price);
        ShippingOption {
            service_name: name.to_string(),
            service_code: name.to_string(),
            company_code: "JP_POST".to_string(),
            price_usd: price_jpy.to_usd(),
            price_jpy,
            delivery_days: "2-4".to_string(),
            tracking: false,
            insurance: false,
            service_type: ServiceType::Standard,
            weight_range: None,
            source,
        }
    }

    fn summary() -> CorrectionSummary {
        CorrectionSummary {
            profile_id: Some(ProfileId::new(1)),
            profile_name: "Default".to_string(),
            weight_change: "+5.0%".to_string(),
        }
    }

    #[test]
    fn test_empty_options_single_note() {
        let (options, notes) = rank_and_recommend(Vec::new(), Some(&summary()));
        assert!(options.is_empty());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "No options");
    }

    #[test]
    fn test_sorts_by_price_ascending() {
        let (options, _) = rank_and_recommend(
            vec![
                option("B", 3500, DataSource::Database),
                option("A", 2100, DataSource::Database),
                option("C", 4200, DataSource::Mock),
            ],
            None,
        );
        let prices: Vec<i64> = options.iter().map(|o| o.price_jpy.amount()).collect();
        assert_eq!(prices, vec![2100, 3500, 4200]);
    }

    #[test]
    fn test_equal_prices_keep_lookup_order() {
        let (options, _) = rank_and_recommend(
            vec![
                option("DB", 3000, DataSource::Database),
                option("EST", 3000, DataSource::Mock),
            ],
            None,
        );
        assert_eq!(options[0].service_name, "DB");
        assert_eq!(options[1].service_name, "EST");
    }

    #[test]
    fn test_note_order_with_correction_and_database() {
        let (_, notes) = rank_and_recommend(
            vec![
                option("EST", 4200, DataSource::Mock),
                option("EMS", 2100, DataSource::Database),
            ],
            Some(&summary()),
        );
        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Correction applied", "Cheapest option", "Live rate"]);
    }

    #[test]
    fn test_correction_note_names_profile_and_weight_change() {
        let (_, notes) = rank_and_recommend(
            vec![option("EST", 4200, DataSource::Mock)],
            Some(&summary()),
        );
        assert!(notes[0].message.contains("\"Default\""));
        assert!(notes[0].message.contains("+5.0%"));
    }

    #[test]
    fn test_cheapest_note_formats_price_with_separators() {
        let (_, notes) = rank_and_recommend(vec![option("EST", 12800, DataSource::Mock)], None);
        assert_eq!(notes[0].title, "Cheapest option");
        assert!(notes[0].message.contains("¥12,800"));
        assert!(notes[0].message.contains("2-4 days"));
    }

    #[test]
    fn test_no_database_note_for_estimate_only_quotes() {
        let (_, notes) = rank_and_recommend(vec![option("EST", 4200, DataSource::Mock)], None);
        assert!(notes.iter().all(|n| n.title != "Live rate"));
    }

    #[test]
    fn test_database_note_names_first_database_option() {
        let (_, notes) = rank_and_recommend(
            vec![
                option("SAL", 1800, DataSource::Database),
                option("EMS", 2100, DataSource::Database),
            ],
            None,
        );
        let live = notes.iter().find(|n| n.title == "Live rate").unwrap();
        assert!(live.message.contains("SAL"));
    }
}
