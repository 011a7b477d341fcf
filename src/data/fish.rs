use crate::shared::*;

/// Populate the FishRegistry with the derby catalog.
///
/// Declared order is selection order. Weights sum to 1.0; any shortfall is
/// absorbed by the first entry during selection.
///   - difficulty: 1 = one hit, wide zone; 5 = three hits, narrow zone
///   - time bonus: seconds added to the round clock on a catch
///   - mystery: points and time bonus are rolled when landed
pub fn populate_fish(registry: &mut FishRegistry) {
    let fish: Vec<FishType> = vec![
        FishType {
            id: "minnow".into(),
            name: "Minnow".into(),
            base_points: 10,
            catch_difficulty: 1,
            spawn_weight: 0.40,
            time_bonus_secs: 0,
            is_mystery: false,
        },
        FishType {
            id: "perch".into(),
            name: "Perch".into(),
            base_points: 20,
            catch_difficulty: 2,
            spawn_weight: 0.25,
            time_bonus_secs: 2,
            is_mystery: false,
        },
        FishType {
            id: "bass".into(),
            name: "Largemouth Bass".into(),
            base_points: 35,
            catch_difficulty: 3,
            spawn_weight: 0.15,
            time_bonus_secs: 3,
            is_mystery: false,
        },
        FishType {
            id: "pike".into(),
            name: "Northern Pike".into(),
            base_points: 50,
            catch_difficulty: 4,
            spawn_weight: 0.10,
            time_bonus_secs: 5,
            is_mystery: false,
        },
        FishType {
            id: "sturgeon".into(),
            name: "Golden Sturgeon".into(),
            base_points: 100,
            catch_difficulty: 5,
            spawn_weight: 0.05,
            time_bonus_secs: 8,
            is_mystery: false,
        },
        // Values are placeholders; rolled on catch.
        FishType {
            id: "mystery".into(),
            name: "Mystery Fish".into(),
            base_points: 0,
            catch_difficulty: 3,
            spawn_weight: 0.05,
            time_bonus_secs: 0,
            is_mystery: true,
        },
    ];

    registry.fish = fish;
}

/// Human-readable problems with a catalog; empty when it is usable as-is.
pub fn validate_catalog(registry: &FishRegistry) -> Vec<String> {
    let mut problems = Vec::new();
    if registry.fish.is_empty() {
        problems.push("catalog is empty".to_string());
    }
    for fish in &registry.fish {
        if !(fish.spawn_weight > 0.0 && fish.spawn_weight <= 1.0) {
            problems.push(format!("{} has spawn weight {}", fish.id, fish.spawn_weight));
        }
        if fish.catch_difficulty < 1 {
            problems.push(format!("{} has difficulty 0", fish.id));
        }
    }
    let total = registry.total_weight();
    if total > 1.0 + 1e-6 {
        problems.push(format!("spawn weights sum to {:.4}", total));
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FishRegistry {
        let mut registry = FishRegistry::default();
        populate_fish(&mut registry);
        registry
    }

    #[test]
    fn test_catalog_is_valid() {
        assert!(validate_catalog(&catalog()).is_empty());
    }

    #[test]
    fn test_catalog_weights_sum_to_one() {
        assert!((catalog().total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_has_exactly_one_mystery_fish() {
        let registry = catalog();
        assert_eq!(registry.fish.iter().filter(|f| f.is_mystery).count(), 1);
        assert!(registry.fish.iter().any(|f| f.id == "mystery" && f.is_mystery));
    }

    #[test]
    fn test_overweight_catalog_is_reported() {
        let mut registry = catalog();
        registry.fish[0].spawn_weight = 0.9;
        let problems = validate_catalog(&registry);
        assert!(problems.iter().any(|p| p.contains("sum")));
    }
}
