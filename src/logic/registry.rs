use crate::error::Result;
use crate::models::{CropCatalogEntry, CropProfile, GrowthStage, OptimalRange};

/// Read-only catalog of crop profiles, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct CropRegistry {
    profiles: Vec<CropProfile>,
}

impl CropRegistry {
    /// The five crops offered on the rental plots.
    pub fn builtin() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }

    /// Builtin catalog plus extra profiles, validated. A profile whose id is
    /// already registered replaces the existing entry in place.
    pub fn with_profiles(extra: Vec<CropProfile>) -> Result<Self> {
        let mut registry = Self::builtin();
        for profile in extra {
            registry.register(profile)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, profile: CropProfile) -> Result<()> {
        profile.validate()?;

        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => {
                tracing::info!(crop = %profile.id, "Replacing builtin crop profile");
                *existing = profile;
            }
            None => {
                tracing::debug!(crop = %profile.id, "Registering crop profile");
                self.profiles.push(profile);
            }
        }
        Ok(())
    }

    pub fn lookup(&self, crop_type: &str) -> Option<&CropProfile> {
        self.profiles.iter().find(|p| p.id == crop_type)
    }

    pub fn list_all(&self) -> Vec<CropCatalogEntry> {
        self.profiles.iter().map(CropProfile::catalog_entry).collect()
    }

    pub fn profiles(&self) -> &[CropProfile] {
        &self.profiles
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    name: &str,
    local_name: &str,
    growth_duration_days: i64,
    intervals: (i64, i64, i64),
    optimal_temperature: OptimalRange,
    optimal_humidity: OptimalRange,
    stages: Vec<GrowthStage>,
) -> CropProfile {
    let (watering, fertilizing, weeding) = intervals;
    CropProfile {
        id: id.to_string(),
        name: name.to_string(),
        local_name: Some(local_name.to_string()),
        growth_duration_days,
        watering_interval_days: watering,
        fertilizing_interval_days: fertilizing,
        weeding_interval_days: weeding,
        optimal_temperature,
        optimal_humidity,
        stages,
    }
}

fn builtin_profiles() -> Vec<CropProfile> {
    vec![
        profile(
            "tomato",
            "Tomato",
            "番茄",
            90,
            (2, 14, 10),
            OptimalRange::new(15.0, 28.0),
            OptimalRange::new(60.0, 80.0),
            vec![
                GrowthStage::new("Seedling", 20, &["keep warm", "water moderately"]),
                GrowthStage::new(
                    "Vegetative",
                    30,
                    &["increase watering", "apply nitrogen fertilizer"],
                ),
                GrowthStage::new(
                    "Flowering",
                    20,
                    &["reduce watering", "apply phosphorus-potassium fertilizer"],
                ),
                GrowthStage::new(
                    "Fruiting",
                    20,
                    &["water evenly", "pest and disease control"],
                ),
            ],
        ),
        profile(
            "cucumber",
            "Cucumber",
            "黄瓜",
            60,
            (1, 10, 7),
            OptimalRange::new(18.0, 32.0),
            OptimalRange::new(70.0, 90.0),
            vec![
                GrowthStage::new(
                    "Seedling",
                    15,
                    &["keep warm and humid", "disease prevention"],
                ),
                GrowthStage::new("Vining", 20, &["build trellis", "top-dress fertilizer"]),
                GrowthStage::new("Flowering & Fruiting", 25, &["pollinate", "harvest"]),
            ],
        ),
        profile(
            "lettuce",
            "Lettuce",
            "生菜",
            40,
            (2, 15, 10),
            OptimalRange::new(15.0, 20.0),
            OptimalRange::new(60.0, 70.0),
            vec![
                GrowthStage::new("Germination", 7, &["keep moist", "provide shade"]),
                GrowthStage::new("Vegetative", 20, &["fertilize", "water"]),
                GrowthStage::new("Maturity", 13, &["limit watering", "prepare for harvest"]),
            ],
        ),
        profile(
            "spinach",
            "Spinach",
            "菠菜",
            35,
            (3, 14, 10),
            OptimalRange::new(10.0, 22.0),
            OptimalRange::new(50.0, 70.0),
            vec![
                GrowthStage::new("Germination", 7, &["keep soil moist"]),
                GrowthStage::new("Vegetative", 20, &["apply nitrogen fertilizer", "weed"]),
                GrowthStage::new("Maturity", 8, &["stop fertilizing"]),
            ],
        ),
        profile(
            "carrot",
            "Carrot",
            "胡萝卜",
            100,
            (4, 20, 14),
            OptimalRange::new(15.0, 25.0),
            OptimalRange::new(50.0, 70.0),
            vec![
                GrowthStage::new("Germination", 10, &["keep soil moist", "cover for shade"]),
                GrowthStage::new("Seedling", 20, &["thin seedlings", "weed"]),
                GrowthStage::new("Root Swelling", 50, &["top-dress fertilizer", "pest control"]),
                GrowthStage::new("Maturity", 20, &["limit watering", "prepare for harvest"]),
            ],
        ),
    ]
}
