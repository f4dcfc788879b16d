//! Seed the database with correction profiles and a carrier rate card.
//!
//! The rate card is a curated snapshot of the tariffs the quote engine is
//! calibrated against: Japan Post products (EMS, ePacket, parcels) plus the
//! express couriers, for the destinations the resale desk actually ships to.
//! Band bounds are in grams, exclusive at the lower bound and inclusive at
//! the upper bound.

use tracing::info;

use hikyaku_core::{CountryCode, Yen};
use hikyaku_server::db::{self, CreateProfile, CreateRate, ProfileRepository, RateRepository};
use hikyaku_server::models::Correction;

/// One service's weight bands for one destination.
struct RateSeed {
    company: &'static str,
    service: &'static str,
    carrier: &'static str,
    country: &'static str,
    zone: Option<&'static str>,
    /// `(weight_from_g, weight_to_g, price_jpy)` triples.
    bands: &'static [(i32, i32, i64)],
}

/// Curated rate card. The US gets the full product lineup; other lanes carry
/// the services the desk actually books there.
const RATE_CARD: &[RateSeed] = &[
    // --- United States (Japan Post zone 4) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "US",
        zone: Some("4"),
        bands: &[
            (0, 500, 3900),
            (500, 1000, 5300),
            (1000, 1500, 6700),
            (1500, 2000, 8100),
            (2000, 3000, 10_900),
            (3000, 5000, 16_500),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "EPACKET",
        carrier: "JP_POST",
        country: "US",
        zone: Some("4"),
        bands: &[(0, 500, 1450), (500, 1000, 2150), (1000, 2000, 3550)],
    },
    RateSeed {
        company: "JP_POST",
        service: "AIR_PARCEL",
        carrier: "JP_POST",
        country: "US",
        zone: Some("4"),
        bands: &[
            (0, 1000, 3850),
            (1000, 2000, 5750),
            (2000, 3000, 7650),
            (3000, 5000, 11_450),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "SAL_PARCEL",
        carrier: "JP_POST",
        country: "US",
        zone: Some("4"),
        bands: &[
            (0, 1000, 3200),
            (1000, 2000, 4500),
            (2000, 3000, 5800),
            (3000, 5000, 8400),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "SURFACE_PARCEL",
        carrier: "JP_POST",
        country: "US",
        zone: Some("4"),
        bands: &[
            (0, 1000, 2500),
            (1000, 2000, 3300),
            (2000, 3000, 4100),
            (3000, 5000, 5700),
        ],
    },
    RateSeed {
        company: "DHL",
        service: "DHL_EXPRESS",
        carrier: "DHL",
        country: "US",
        zone: None,
        bands: &[
            (0, 500, 5200),
            (500, 1000, 6300),
            (1000, 2000, 8600),
            (2000, 5000, 14_800),
        ],
    },
    RateSeed {
        company: "FEDEX",
        service: "FEDEX_INTL_EXPRESS",
        carrier: "FEDEX",
        country: "US",
        zone: None,
        bands: &[
            (0, 500, 5600),
            (500, 1000, 6900),
            (1000, 2000, 9400),
            (2000, 5000, 16_200),
        ],
    },
    RateSeed {
        company: "FEDEX",
        service: "FEDEX_CONNECT",
        carrier: "FEDEX",
        country: "US",
        zone: None,
        bands: &[
            (0, 500, 3300),
            (500, 1000, 4100),
            (1000, 2000, 5600),
            (2000, 5000, 9800),
        ],
    },
    // Yamato hands US parcels to UPS for the final leg
    RateSeed {
        company: "YAMATO",
        service: "YAMATO_INTL",
        carrier: "UPS",
        country: "US",
        zone: None,
        bands: &[(0, 2000, 5100), (2000, 5000, 8700)],
    },
    // --- Canada (Japan Post zone 3) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "CA",
        zone: Some("3"),
        bands: &[
            (0, 500, 3300),
            (500, 1000, 4500),
            (1000, 2000, 6900),
            (2000, 5000, 13_700),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "EPACKET",
        carrier: "JP_POST",
        country: "CA",
        zone: Some("3"),
        bands: &[(0, 500, 1390), (500, 1000, 2000), (1000, 2000, 3260)],
    },
    RateSeed {
        company: "JP_POST",
        service: "SAL_PARCEL",
        carrier: "JP_POST",
        country: "CA",
        zone: Some("3"),
        bands: &[(0, 1000, 3000), (1000, 2000, 4200), (2000, 5000, 7800)],
    },
    RateSeed {
        company: "DHL",
        service: "DHL_EXPRESS",
        carrier: "DHL",
        country: "CA",
        zone: None,
        bands: &[
            (0, 500, 5000),
            (500, 1000, 6100),
            (1000, 2000, 8200),
            (2000, 5000, 14_100),
        ],
    },
    // --- United Kingdom (Japan Post zone 3) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "GB",
        zone: Some("3"),
        bands: &[
            (0, 500, 3600),
            (500, 1000, 4900),
            (1000, 2000, 7400),
            (2000, 5000, 14_900),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "EPACKET",
        carrier: "JP_POST",
        country: "GB",
        zone: Some("3"),
        bands: &[(0, 500, 1540), (500, 1000, 2280), (1000, 2000, 3760)],
    },
    RateSeed {
        company: "JP_POST",
        service: "AIR_PARCEL",
        carrier: "JP_POST",
        country: "GB",
        zone: Some("3"),
        bands: &[(0, 1000, 4400), (1000, 2000, 6500), (2000, 5000, 12_800)],
    },
    RateSeed {
        company: "DHL",
        service: "DHL_EXPRESS",
        carrier: "DHL",
        country: "GB",
        zone: None,
        bands: &[
            (0, 500, 5400),
            (500, 1000, 6600),
            (1000, 2000, 9000),
            (2000, 5000, 15_600),
        ],
    },
    // --- Germany (Japan Post zone 3) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "DE",
        zone: Some("3"),
        bands: &[
            (0, 500, 3600),
            (500, 1000, 4900),
            (1000, 2000, 7400),
            (2000, 5000, 14_900),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "EPACKET",
        carrier: "JP_POST",
        country: "DE",
        zone: Some("3"),
        bands: &[(0, 500, 1540), (500, 1000, 2280), (1000, 2000, 3760)],
    },
    RateSeed {
        company: "JP_POST",
        service: "SAL_PARCEL",
        carrier: "JP_POST",
        country: "DE",
        zone: Some("3"),
        bands: &[(0, 1000, 3400), (1000, 2000, 4800), (2000, 5000, 8900)],
    },
    RateSeed {
        company: "FEDEX",
        service: "FEDEX_CONNECT",
        carrier: "FEDEX",
        country: "DE",
        zone: None,
        bands: &[
            (0, 500, 3500),
            (500, 1000, 4400),
            (1000, 2000, 6000),
            (2000, 5000, 10_400),
        ],
    },
    // --- Australia (Japan Post zone 3) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "AU",
        zone: Some("3"),
        bands: &[
            (0, 500, 3100),
            (500, 1000, 4200),
            (1000, 2000, 6400),
            (2000, 5000, 12_600),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "EPACKET",
        carrier: "JP_POST",
        country: "AU",
        zone: Some("3"),
        bands: &[(0, 500, 1390), (500, 1000, 2050), (1000, 2000, 3380)],
    },
    RateSeed {
        company: "YAMATO",
        service: "YAMATO_INTL",
        carrier: "UPS",
        country: "AU",
        zone: None,
        bands: &[(0, 2000, 4800), (2000, 5000, 8200)],
    },
    // --- Singapore (Japan Post zone 2) ---
    RateSeed {
        company: "JP_POST",
        service: "EMS",
        carrier: "JP_POST",
        country: "SG",
        zone: Some("2"),
        bands: &[
            (0, 500, 2400),
            (500, 1000, 3200),
            (1000, 2000, 4800),
            (2000, 5000, 9400),
        ],
    },
    RateSeed {
        company: "JP_POST",
        service: "SMALL_PACKET_AIR",
        carrier: "JP_POST",
        country: "SG",
        zone: Some("2"),
        bands: &[(0, 500, 1000), (500, 1000, 1480), (1000, 2000, 2440)],
    },
    RateSeed {
        company: "DHL",
        service: "DHL_EXPRESS",
        carrier: "DHL",
        country: "SG",
        zone: None,
        bands: &[
            (0, 500, 4300),
            (500, 1000, 5200),
            (1000, 2000, 7000),
            (2000, 5000, 11_900),
        ],
    },
];

/// The stock correction profiles every fresh install starts with.
///
/// The default mirrors the engine's built-in fallback so quotes behave the
/// same whether or not seeding has run.
fn stock_profiles() -> Vec<CreateProfile> {
    vec![
        CreateProfile {
            name: "Standard corrections".to_owned(),
            description: "Baseline bump covering typical under-declared listings".to_owned(),
            is_default: true,
            priority: 10,
            category_scope: None,
            weight_min_kg: None,
            weight_max_kg: None,
            weight_rule: Correction::Percentage(5.0),
            length_rule: Correction::Percentage(10.0),
            width_rule: Correction::Percentage(10.0),
            height_rule: Correction::Percentage(10.0),
            uniform_rule: None,
        },
        CreateProfile {
            name: "Apparel and soft goods".to_owned(),
            description: "Lighter touch for compressible items packed flat".to_owned(),
            is_default: false,
            priority: 20,
            category_scope: Some("apparel".to_owned()),
            weight_min_kg: None,
            weight_max_kg: Some(3.0),
            weight_rule: Correction::Percentage(3.0),
            length_rule: Correction::Unchanged,
            width_rule: Correction::Unchanged,
            height_rule: Correction::Unchanged,
            uniform_rule: Some(Correction::Percentage(5.0)),
        },
        CreateProfile {
            name: "Oversize and fragile".to_owned(),
            description: "Packaging allowance for double-boxed or crated items".to_owned(),
            is_default: false,
            priority: 30,
            category_scope: Some("fragile".to_owned()),
            weight_min_kg: Some(5.0),
            weight_max_kg: None,
            weight_rule: Correction::Percentage(8.0),
            length_rule: Correction::Fixed(3.0),
            width_rule: Correction::Fixed(3.0),
            height_rule: Correction::Fixed(3.0),
            uniform_rule: None,
        },
    ]
}

/// Seed correction profiles and the carrier rate table.
///
/// A fresh run on a populated database is a no-op; pass `reset` to wipe and
/// re-seed instead.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a database operation
/// fails.
pub async fn run(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let profiles = ProfileRepository::new(pool.clone());
    let rates = RateRepository::new(pool);

    if reset {
        let removed_rates = rates.delete_all().await?;
        let removed_profiles = profiles.delete_all().await?;
        info!(removed_profiles, removed_rates, "Cleared existing data");
    } else if profiles.count().await? > 0 || rates.count().await? > 0 {
        info!("Database already seeded; use --reset to re-seed");
        return Ok(());
    }

    let mut profiles_inserted = 0_u64;
    for params in stock_profiles() {
        profiles.create(params).await?;
        profiles_inserted += 1;
    }

    let mut rates_inserted = 0_u64;
    for seed in RATE_CARD {
        let country: CountryCode = seed.country.parse()?;
        for &(weight_from_g, weight_to_g, price) in seed.bands {
            rates
                .insert(CreateRate {
                    company_code: seed.company.to_owned(),
                    service_code: seed.service.to_owned(),
                    carrier_code: seed.carrier.to_owned(),
                    country_code: country.clone(),
                    weight_from_g,
                    weight_to_g,
                    price_jpy: Yen::new(price),
                    zone_code: seed.zone.map(str::to_owned),
                })
                .await?;
            rates_inserted += 1;
        }
    }

    // Print summary
    info!("Seeding complete!");
    info!("  Profiles inserted: {profiles_inserted}");
    info!("  Rate rows inserted: {rates_inserted}");

    Ok(())
}

/// Show statistics for the seeded data.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the queries fail.
pub async fn stats() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let profiles = ProfileRepository::new(pool.clone());
    let rates = RateRepository::new(pool);

    let profile_count = profiles.count().await?;
    let rate_count = rates.count().await?;
    let by_country = rates.country_counts().await?;

    info!("Shipping Data Statistics");
    info!("========================");
    info!("Correction profiles: {profile_count}");
    info!("Rate rows: {rate_count}");
    info!("By destination:");

    for country in by_country {
        info!("  {}: {}", country.country_code, country.count);
    }

    Ok(())
}
