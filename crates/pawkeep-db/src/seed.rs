//! Idempotent startup seeding for lookup tables and default rosters.
//!
//! Invoked once at process initialization. Species, breeds, and vets are
//! seeded only when their tables are empty; walkers and sitters are keyed by
//! name so re-running never duplicates rows. Everything runs in a single
//! transaction.

use sqlx::{PgPool, Postgres, Transaction};

use crate::DbError;

struct SpeciesSeed {
    name: &'static str,
    icon: &'static str,
    breeds: &'static [&'static str],
}

struct ProviderSeed {
    name: &'static str,
    bio: &'static str,
    rate: f64,
    rating: f64,
    categories: &'static str,
}

struct VetSeed {
    name: &'static str,
    address: &'static str,
    phone: &'static str,
    latitude: f64,
    longitude: f64,
    rating: f64,
    reviews_count: i32,
    is_open: bool,
    is_emergency: bool,
    specialties: &'static [&'static str],
    hours: &'static str,
}

const SPECIES: &[SpeciesSeed] = &[
    SpeciesSeed {
        name: "Dog",
        icon: "🐕",
        breeds: &[
            "Golden Retriever",
            "Labrador Retriever",
            "German Shepherd",
            "French Bulldog",
            "Bulldog",
            "Poodle",
            "Beagle",
            "Rottweiler",
            "Siberian Husky",
            "Pitbull",
            "Border Collie",
            "Chihuahua",
            "Dachshund",
            "Yorkshire Terrier",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Cat",
        icon: "🐱",
        breeds: &[
            "Persian",
            "Maine Coon",
            "British Shorthair",
            "Ragdoll",
            "Siamese",
            "American Shorthair",
            "Scottish Fold",
            "Sphynx",
            "Bengal",
            "Russian Blue",
            "Abyssinian",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Bird",
        icon: "🐦",
        breeds: &[
            "Budgerigar",
            "Cockatiel",
            "Canary",
            "Lovebird",
            "Conure",
            "Cockatoo",
            "African Grey",
            "Macaw",
            "Finch",
            "Parakeet",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Rabbit",
        icon: "🐰",
        breeds: &[
            "Holland Lop",
            "Netherland Dwarf",
            "Lionhead",
            "Flemish Giant",
            "Rex",
            "Mini Rex",
            "English Lop",
            "French Lop",
            "Himalayan",
            "Dutch",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Hamster",
        icon: "🐹",
        breeds: &[
            "Syrian Hamster",
            "Dwarf Hamster",
            "Roborovski",
            "Chinese Hamster",
            "European Hamster",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Fish",
        icon: "🐠",
        breeds: &[
            "Goldfish",
            "Betta",
            "Guppy",
            "Angelfish",
            "Tetra",
            "Cichlid",
            "Discus",
            "Koi",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Turtle",
        icon: "🐢",
        breeds: &[
            "Red-Eared Slider",
            "Box Turtle",
            "Russian Tortoise",
            "Hermann's Tortoise",
            "Greek Tortoise",
            "Sulcata Tortoise",
            "Painted Turtle",
            "Yellow-Bellied Slider",
            "Mixed Breed",
        ],
    },
    SpeciesSeed {
        name: "Other",
        icon: "🐾",
        breeds: &[
            "Guinea Pig",
            "Chinchilla",
            "Ferret",
            "Hedgehog",
            "Sugar Glider",
            "Mixed Breed",
        ],
    },
];

const WALKERS: &[ProviderSeed] = &[
    ProviderSeed {
        name: "Rahul Sharma",
        bio: "Fitness enthusiast, great with energetic breeds.",
        rate: 300.0,
        rating: 4.8,
        categories: "Dogs",
    },
    ProviderSeed {
        name: "Aisha Khan",
        bio: "Gentle with small and senior pets.",
        rate: 350.0,
        rating: 4.9,
        categories: "Dogs,Cats",
    },
    ProviderSeed {
        name: "Vikram Iyer",
        bio: "Loves long park walks and trail routes.",
        rate: 400.0,
        rating: 4.7,
        categories: "Dogs",
    },
    ProviderSeed {
        name: "Neha Patel",
        bio: "Weekend walks and evening slots available.",
        rate: 320.0,
        rating: 4.6,
        categories: "Dogs,Birds",
    },
];

const SITTERS: &[ProviderSeed] = &[
    ProviderSeed {
        name: "Ananya Gupta",
        bio: "Loving home boarding with daily updates.",
        rate: 800.0,
        rating: 4.9,
        categories: "Dogs,Cats",
    },
    ProviderSeed {
        name: "Rohit Verma",
        bio: "Pick & drop to daycare or vet.",
        rate: 700.0,
        rating: 4.7,
        categories: "Dogs",
    },
    ProviderSeed {
        name: "Meera Nair",
        bio: "Quiet space for senior pets.",
        rate: 750.0,
        rating: 4.8,
        categories: "Dogs,Cats,Birds",
    },
];

const VETS: &[VetSeed] = &[
    VetSeed {
        name: "Delhi Veterinary Hospital",
        address: "Near Red Fort, Old Delhi, Delhi 110006",
        phone: "+91-11-2396-1234",
        latitude: 28.6562,
        longitude: 77.2410,
        rating: 4.2,
        reviews_count: 89,
        is_open: true,
        is_emergency: false,
        specialties: &["General Care", "Surgery"],
        hours: "Mon-Sat: 9 AM - 6 PM",
    },
    VetSeed {
        name: "Pet Care Clinic",
        address: "Karol Bagh, New Delhi, Delhi 110005",
        phone: "+91-11-2875-4321",
        latitude: 28.6517,
        longitude: 77.1909,
        rating: 4.5,
        reviews_count: 156,
        is_open: true,
        is_emergency: true,
        specialties: &["Emergency", "24/7", "Critical Care"],
        hours: "Open 24 hours",
    },
    VetSeed {
        name: "Animal Health Center",
        address: "Connaught Place, New Delhi, Delhi 110001",
        phone: "+91-11-2331-5678",
        latitude: 28.6304,
        longitude: 77.2177,
        rating: 4.3,
        reviews_count: 203,
        is_open: false,
        is_emergency: false,
        specialties: &["Dental", "Grooming", "Vaccination"],
        hours: "Mon-Fri: 10 AM - 7 PM",
    },
    VetSeed {
        name: "Emergency Pet Hospital",
        address: "Lajpat Nagar, New Delhi, Delhi 110024",
        phone: "+91-11-2987-6543",
        latitude: 28.5679,
        longitude: 77.2431,
        rating: 4.7,
        reviews_count: 312,
        is_open: true,
        is_emergency: true,
        specialties: &["Emergency", "Surgery", "ICU"],
        hours: "Open 24 hours",
    },
    VetSeed {
        name: "Veterinary Care Services",
        address: "Saket, New Delhi, Delhi 110017",
        phone: "+91-11-2651-9876",
        latitude: 28.5245,
        longitude: 77.2065,
        rating: 4.4,
        reviews_count: 178,
        is_open: true,
        is_emergency: false,
        specialties: &["General Care", "Pet Boarding", "Training"],
        hours: "Mon-Sat: 8 AM - 8 PM",
    },
];

/// Seed species, breeds, walkers, sitters, and vets. Safe to call on every
/// startup.
///
/// Returns the number of rows inserted across all tables.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the whole batch rolls
/// back.
pub async fn seed_defaults(pool: &PgPool) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    inserted += seed_catalog(&mut tx).await?;
    inserted += seed_walkers(&mut tx).await?;
    inserted += seed_sitters(&mut tx).await?;
    inserted += seed_vets(&mut tx).await?;

    tx.commit().await?;
    Ok(inserted)
}

async fn seed_catalog(tx: &mut Transaction<'_, Postgres>) -> Result<usize, DbError> {
    let species_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species")
        .fetch_one(&mut **tx)
        .await?;
    if species_count > 0 {
        return Ok(0);
    }

    let mut inserted = 0usize;
    for species in SPECIES {
        let species_id: i64 =
            sqlx::query_scalar("INSERT INTO species (name, icon) VALUES ($1, $2) RETURNING id")
                .bind(species.name)
                .bind(species.icon)
                .fetch_one(&mut **tx)
                .await?;
        inserted += 1;

        for breed in species.breeds {
            sqlx::query("INSERT INTO breeds (name, species_id) VALUES ($1, $2)")
                .bind(breed)
                .bind(species_id)
                .execute(&mut **tx)
                .await?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

async fn seed_walkers(tx: &mut Transaction<'_, Postgres>) -> Result<usize, DbError> {
    let mut inserted = 0usize;
    for walker in WALKERS {
        let result = sqlx::query(
            "INSERT INTO walkers (name, bio, rate_per_hour, rating, categories) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE NOT EXISTS (SELECT 1 FROM walkers WHERE name = $1)",
        )
        .bind(walker.name)
        .bind(walker.bio)
        .bind(walker.rate)
        .bind(walker.rating)
        .bind(walker.categories)
        .execute(&mut **tx)
        .await?;
        inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
    }
    Ok(inserted)
}

async fn seed_sitters(tx: &mut Transaction<'_, Postgres>) -> Result<usize, DbError> {
    let mut inserted = 0usize;
    for sitter in SITTERS {
        let result = sqlx::query(
            "INSERT INTO sitters (name, bio, rate_per_day, rating, categories) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE NOT EXISTS (SELECT 1 FROM sitters WHERE name = $1)",
        )
        .bind(sitter.name)
        .bind(sitter.bio)
        .bind(sitter.rate)
        .bind(sitter.rating)
        .bind(sitter.categories)
        .execute(&mut **tx)
        .await?;
        inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
    }
    Ok(inserted)
}

async fn seed_vets(tx: &mut Transaction<'_, Postgres>) -> Result<usize, DbError> {
    let vet_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vets")
        .fetch_one(&mut **tx)
        .await?;
    if vet_count > 0 {
        return Ok(0);
    }

    let mut inserted = 0usize;
    for vet in VETS {
        sqlx::query(
            "INSERT INTO vets \
               (name, address, phone, latitude, longitude, rating, reviews_count, \
                is_open, is_emergency, specialties, hours) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(vet.name)
        .bind(vet.address)
        .bind(vet.phone)
        .bind(vet.latitude)
        .bind(vet.longitude)
        .bind(vet.rating)
        .bind(vet.reviews_count)
        .bind(vet.is_open)
        .bind(vet.is_emergency)
        .bind(serde_json::json!(vet.specialties))
        .bind(vet.hours)
        .execute(&mut **tx)
        .await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_data_covers_all_species() {
        assert_eq!(SPECIES.len(), 8);
        assert!(SPECIES.iter().all(|s| !s.breeds.is_empty()));
    }

    #[test]
    fn seed_vets_include_proximity_fixture() {
        // The Old Delhi clinic sits ~5.6 km from the city center query point
        // used by the vet search tests.
        let vet = VETS
            .iter()
            .find(|v| v.name == "Delhi Veterinary Hospital")
            .expect("fixture vet present");
        assert!((vet.latitude - 28.6562).abs() < f64::EPSILON);
        assert!((vet.longitude - 77.2410).abs() < f64::EPSILON);
    }
}
