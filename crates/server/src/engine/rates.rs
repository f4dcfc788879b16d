//! Rate lookup and shipping option construction.
//!
//! Database rows are turned into display-ready options via a small static
//! service table (names, delivery windows, tracking/insurance). A built-in
//! estimated option is always appended so the quote survives an empty rate
//! table or a database outage.

use std::time::Duration;

use hikyaku_core::{CountryCode, DataSource, ServiceType, Yen};
use tracing::{debug, warn};

use super::stores::{RateStore, with_timeout};
use crate::models::{RateTableRow, ShippingOption};

/// Maximum number of rate table rows considered per quote.
pub const MAX_RATE_RESULTS: usize = 10;

/// Base fee of the built-in estimated option, in JPY.
pub const ESTIMATE_BASE_FEE_JPY: f64 = 2800.0;

/// Per-kilogram fee of the built-in estimated option, in JPY.
pub const ESTIMATE_PER_KG_JPY: f64 = 600.0;

/// Delivery window shown for services missing from the service table.
const GENERIC_DELIVERY_DAYS: &str = "7-21";

/// Display metadata for a known carrier service.
struct ServiceInfo {
    code: &'static str,
    name: &'static str,
    delivery_days: &'static str,
    tracking: bool,
    insurance: bool,
}

/// Known services on the rate cards we load. Tracking and insurance are only
/// flagged on the express products; economy surface/air products ship
/// without either unless purchased separately.
const SERVICE_TABLE: &[ServiceInfo] = &[
    ServiceInfo {
        code: "EMS",
        name: "EMS (Express Mail Service)",
        delivery_days: "2-4",
        tracking: true,
        insurance: true,
    },
    ServiceInfo {
        code: "EPACKET",
        name: "ePacket",
        delivery_days: "7-14",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "SMALL_PACKET_AIR",
        name: "Small Packet (Air)",
        delivery_days: "7-14",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "AIR_PARCEL",
        name: "International Parcel (Air)",
        delivery_days: "6-10",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "SAL_PARCEL",
        name: "International Parcel (SAL)",
        delivery_days: "14-30",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "SURFACE_PARCEL",
        name: "International Parcel (Surface)",
        delivery_days: "30-60",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "DHL_EXPRESS",
        name: "DHL Express Worldwide",
        delivery_days: "2-5",
        tracking: true,
        insurance: true,
    },
    ServiceInfo {
        code: "FEDEX_INTL_EXPRESS",
        name: "FedEx International Priority Express",
        delivery_days: "1-3",
        tracking: true,
        insurance: true,
    },
    ServiceInfo {
        code: "FEDEX_CONNECT",
        name: "FedEx International Connect Plus",
        delivery_days: "3-7",
        tracking: false,
        insurance: false,
    },
    ServiceInfo {
        code: "YAMATO_INTL",
        name: "Yamato International TA-Q-BIN",
        delivery_days: "5-9",
        tracking: false,
        insurance: false,
    },
];

fn service_info(service_code: &str) -> Option<&'static ServiceInfo> {
    let code = service_code.to_uppercase();
    SERVICE_TABLE.iter().find(|s| s.code == code)
}

/// Convert a chargeable weight in kg to whole grams for band matching.
#[must_use]
pub fn weight_to_grams(weight_kg: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let grams = (weight_kg * 1000.0).round() as i64;
    i32::try_from(grams).unwrap_or(i32::MAX)
}

/// Classify a service as express or standard from its code.
#[must_use]
pub fn classify_service(service_code: &str) -> ServiceType {
    let code = service_code.to_uppercase();
    if code.contains("EXPRESS") || code == "EMS" {
        ServiceType::Express
    } else {
        ServiceType::Standard
    }
}

/// Build a display-ready option from a rate table row.
#[must_use]
pub fn option_from_row(row: RateTableRow) -> ShippingOption {
    let info = service_info(&row.service_code);
    let weight_range = Some(row.band_label());

    ShippingOption {
        service_name: info.map_or_else(|| row.service_code.clone(), |i| i.name.to_string()),
        service_type: classify_service(&row.service_code),
        delivery_days: info
            .map_or(GENERIC_DELIVERY_DAYS, |i| i.delivery_days)
            .to_string(),
        tracking: info.is_some_and(|i| i.tracking),
        insurance: info.is_some_and(|i| i.insurance),
        price_usd: row.price_jpy.to_usd(),
        price_jpy: row.price_jpy,
        service_code: row.service_code,
        company_code: row.company_code,
        weight_range,
        source: row.data_source,
    }
}

/// The built-in estimated option: a flat base fee plus a per-kg fee.
///
/// Kept deliberately above typical economy rates so a quote produced during
/// an outage does not undercut the real rate cards.
#[must_use]
pub fn estimate_option(chargeable_kg: f64) -> ShippingOption {
    #[allow(clippy::cast_possible_truncation)]
    let amount = (ESTIMATE_BASE_FEE_JPY + ESTIMATE_PER_KG_JPY * chargeable_kg).round() as i64;
    let price_jpy = Yen::new(amount);

    ShippingOption {
        service_name: "Standard International (estimate)".to_string(),
        service_code: "MOCK_STANDARD".to_string(),
        company_code: "MOCK".to_string(),
        price_usd: price_jpy.to_usd(),
        price_jpy,
        delivery_days: "7-14".to_string(),
        tracking: false,
        insurance: false,
        service_type: ServiceType::Standard,
        weight_range: None,
        source: DataSource::Mock,
    }
}

/// Look up rate table options for a destination and chargeable weight.
///
/// Appends the built-in estimated option after any database rows. Store
/// failures and timeouts are logged and degrade to the estimate alone.
/// Returns the options and whether any of them came from the rate table.
pub async fn lookup_options(
    store: &dyn RateStore,
    destination: &CountryCode,
    chargeable_kg: f64,
    timeout: Duration,
) -> (Vec<ShippingOption>, bool) {
    let weight_grams = weight_to_grams(chargeable_kg);

    let rows = match with_timeout(timeout, store.query_rates(destination, weight_grams)).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(
                error = %e,
                destination = %destination,
                weight_grams,
                "Rate store unavailable, quoting from the built-in estimate only"
            );
            Vec::new()
        }
    };
    let database_used = !rows.is_empty();
    debug!(row_count = rows.len(), weight_grams, "Rate table lookup");

    let mut options: Vec<ShippingOption> = rows.into_iter().map(option_from_row).collect();
    options.push(estimate_option(chargeable_kg));
    (options, database_used)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;
    use crate::engine::stores::StaticRateStore;
    use async_trait::async_trait;
    use hikyaku_core::RateId;
    use rust_decimal::Decimal;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn row(service: &str, price: i64) -> RateTableRow {
        RateTableRow {
            id: RateId::new(1),
            company_code: "JP_POST".to_string(),
            service_code: service.to_string(),
            carrier_code: "JP_POST".to_string(),
            country_code: "US".parse().unwrap(),
            weight_from_g: 1500,
            weight_to_g: 2000,
            price_jpy: Yen::new(price),
            zone_code: None,
            data_source: DataSource::Database,
        }
    }

    #[test]
    fn test_weight_to_grams() {
        assert_eq!(weight_to_grams(1.575), 1575);
        assert_eq!(weight_to_grams(0.5), 500);
        assert_eq!(weight_to_grams(0.0004), 0);
        assert_eq!(weight_to_grams(0.0005), 1);
    }

    #[test]
    fn test_classify_service() {
        assert_eq!(classify_service("EMS"), ServiceType::Express);
        assert_eq!(classify_service("DHL_EXPRESS"), ServiceType::Express);
        assert_eq!(classify_service("FEDEX_INTL_EXPRESS"), ServiceType::Express);
        assert_eq!(classify_service("EPACKET"), ServiceType::Standard);
        assert_eq!(classify_service("SURFACE_PARCEL"), ServiceType::Standard);
        // EMS must match exactly, not as a substring
        assert_eq!(classify_service("EMSX"), ServiceType::Standard);
    }

    #[test]
    fn test_option_from_known_service() {
        let option = option_from_row(row("EMS", 2100));
        assert_eq!(option.service_name, "EMS (Express Mail Service)");
        assert_eq!(option.delivery_days, "2-4");
        assert!(option.tracking);
        assert!(option.insurance);
        assert_eq!(option.service_type, ServiceType::Express);
        assert_eq!(option.weight_range.as_deref(), Some("1.5-2 kg"));
        assert_eq!(option.source, DataSource::Database);
        assert_eq!(option.price_usd, Decimal::new(1400, 2)); // 2100 / 150
    }

    #[test]
    fn test_option_from_unknown_service_uses_raw_code() {
        let option = option_from_row(row("PELICAN_AIR", 1800));
        assert_eq!(option.service_name, "PELICAN_AIR");
        assert_eq!(option.delivery_days, GENERIC_DELIVERY_DAYS);
        assert!(!option.tracking);
        assert!(!option.insurance);
        assert_eq!(option.service_type, ServiceType::Standard);
    }

    #[test]
    fn test_estimate_option_cost() {
        // 2800 + 600 * 1.575 = 3745
        let option = estimate_option(1.575);
        assert_eq!(option.price_jpy, Yen::new(3745));
        assert_eq!(option.price_usd.to_string(), "24.97");
        assert_eq!(option.source, DataSource::Mock);
        assert_eq!(option.weight_range, None);
        assert!(!option.tracking);
    }

    #[test]
    fn test_estimate_option_rounds_cost() {
        // 2800 + 600 * 0.333 = 2999.8 -> 3000
        let option = estimate_option(0.333);
        assert_eq!(option.price_jpy, Yen::new(3000));
    }

    #[tokio::test]
    async fn test_lookup_options_appends_estimate_after_rows() {
        let store = StaticRateStore::new(vec![row("EMS", 2100)]);
        let (options, database_used) =
            lookup_options(&store, &"US".parse().unwrap(), 1.575, TIMEOUT).await;

        assert!(database_used);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].source, DataSource::Database);
        assert_eq!(options[1].source, DataSource::Mock);
    }

    #[tokio::test]
    async fn test_lookup_options_empty_table_estimate_only() {
        let store = StaticRateStore::default();
        let (options, database_used) =
            lookup_options(&store, &"US".parse().unwrap(), 1.575, TIMEOUT).await;

        assert!(!database_used);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].source, DataSource::Mock);
    }

    struct FailingRateStore;

    #[async_trait]
    impl RateStore for FailingRateStore {
        async fn query_rates(
            &self,
            _destination: &CountryCode,
            _weight_grams: i32,
        ) -> Result<Vec<RateTableRow>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_lookup_options_store_error_degrades_to_estimate() {
        let (options, database_used) =
            lookup_options(&FailingRateStore, &"US".parse().unwrap(), 2.0, TIMEOUT).await;

        assert!(!database_used);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].source, DataSource::Mock);
        assert_eq!(options[0].price_jpy, Yen::new(4000)); // 2800 + 600 * 2
    }

    struct HangingRateStore;

    #[async_trait]
    impl RateStore for HangingRateStore {
        async fn query_rates(
            &self,
            _destination: &CountryCode,
            _weight_grams: i32,
        ) -> Result<Vec<RateTableRow>, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_lookup_options_timeout_degrades_to_estimate() {
        let (options, database_used) = lookup_options(
            &HangingRateStore,
            &"US".parse().unwrap(),
            2.0,
            Duration::from_millis(10),
        )
        .await;

        assert!(!database_used);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].source, DataSource::Mock);
    }
}
