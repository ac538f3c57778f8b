//! Nutrient field descriptors
//!
//! The intrinsic nutrient fields carried by every ingredient, the derived
//! ratios computed from a blended profile, and the per-ingredient profile
//! struct that holds one value per intrinsic field.

use serde::{Deserialize, Serialize};

/// An intrinsic nutrient field of a feed ingredient.
///
/// Serialized names match the catalog field names (`CP_pct`, `ME_kcal_per_kg`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "CP_pct")]
    CrudeProtein,
    #[serde(rename = "ME_kcal_per_kg")]
    MetabolizableEnergy,
    #[serde(rename = "Ca_pct")]
    Calcium,
    #[serde(rename = "avP_pct")]
    AvailablePhosphorus,
    #[serde(rename = "phytateP_pct")]
    PhytatePhosphorus,
    #[serde(rename = "Na_pct")]
    Sodium,
    #[serde(rename = "K_pct")]
    Potassium,
    #[serde(rename = "Cl_pct")]
    Chlorine,
    #[serde(rename = "Lys_pct")]
    Lysine,
    #[serde(rename = "TSAA_pct")]
    MethionineCystine,
    #[serde(rename = "Thr_pct")]
    Threonine,
    #[serde(rename = "Val_pct")]
    Valine,
    #[serde(rename = "Ile_pct")]
    Isoleucine,
    #[serde(rename = "Leu_pct")]
    Leucine,
    #[serde(rename = "Arg_pct")]
    Arginine,
    #[serde(rename = "Try_pct")]
    Tryptophan,
    #[serde(rename = "Starch_pct")]
    Starch,
    #[serde(rename = "CF_pct")]
    CrudeFiber,
    #[serde(rename = "NDF_pct")]
    NeutralDetergentFiber,
    #[serde(rename = "ADF_pct")]
    AcidDetergentFiber,
    #[serde(rename = "Ash_pct")]
    Ash,
    #[serde(rename = "Choline_mg_per_kg")]
    Choline,
}

impl Nutrient {
    /// Every intrinsic field, in catalog column order
    pub const ALL: [Nutrient; 22] = [
        Nutrient::CrudeProtein,
        Nutrient::MetabolizableEnergy,
        Nutrient::Calcium,
        Nutrient::AvailablePhosphorus,
        Nutrient::PhytatePhosphorus,
        Nutrient::Sodium,
        Nutrient::Potassium,
        Nutrient::Chlorine,
        Nutrient::Lysine,
        Nutrient::MethionineCystine,
        Nutrient::Threonine,
        Nutrient::Valine,
        Nutrient::Isoleucine,
        Nutrient::Leucine,
        Nutrient::Arginine,
        Nutrient::Tryptophan,
        Nutrient::Starch,
        Nutrient::CrudeFiber,
        Nutrient::NeutralDetergentFiber,
        Nutrient::AcidDetergentFiber,
        Nutrient::Ash,
        Nutrient::Choline,
    ];

    /// Field name used in catalogs and analysis results
    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::CrudeProtein => "CP_pct",
            Nutrient::MetabolizableEnergy => "ME_kcal_per_kg",
            Nutrient::Calcium => "Ca_pct",
            Nutrient::AvailablePhosphorus => "avP_pct",
            Nutrient::PhytatePhosphorus => "phytateP_pct",
            Nutrient::Sodium => "Na_pct",
            Nutrient::Potassium => "K_pct",
            Nutrient::Chlorine => "Cl_pct",
            Nutrient::Lysine => "Lys_pct",
            Nutrient::MethionineCystine => "TSAA_pct",
            Nutrient::Threonine => "Thr_pct",
            Nutrient::Valine => "Val_pct",
            Nutrient::Isoleucine => "Ile_pct",
            Nutrient::Leucine => "Leu_pct",
            Nutrient::Arginine => "Arg_pct",
            Nutrient::Tryptophan => "Try_pct",
            Nutrient::Starch => "Starch_pct",
            Nutrient::CrudeFiber => "CF_pct",
            Nutrient::NeutralDetergentFiber => "NDF_pct",
            Nutrient::AcidDetergentFiber => "ADF_pct",
            Nutrient::Ash => "Ash_pct",
            Nutrient::Choline => "Choline_mg_per_kg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::CrudeProtein => "Crude Protein %",
            Nutrient::MetabolizableEnergy => "ME (kcal/kg)",
            Nutrient::Calcium => "Calcium %",
            Nutrient::AvailablePhosphorus => "Av. Phosphorus %",
            Nutrient::PhytatePhosphorus => "Phytate P %",
            Nutrient::Sodium => "Sodium %",
            Nutrient::Potassium => "Potassium %",
            Nutrient::Chlorine => "Chlorine %",
            Nutrient::Lysine => "Lysine %",
            Nutrient::MethionineCystine => "Met+Cys %",
            Nutrient::Threonine => "Threonine %",
            Nutrient::Valine => "Valine %",
            Nutrient::Isoleucine => "Isoleucine %",
            Nutrient::Leucine => "Leucine %",
            Nutrient::Arginine => "Arginine %",
            Nutrient::Tryptophan => "Tryptophan %",
            Nutrient::Starch => "Starch %",
            Nutrient::CrudeFiber => "Crude Fiber %",
            Nutrient::NeutralDetergentFiber => "NDF %",
            Nutrient::AcidDetergentFiber => "ADF %",
            Nutrient::Ash => "Ash %",
            Nutrient::Choline => "Choline (mg/kg)",
        }
    }

    /// Parse a catalog field name
    pub fn from_key(key: &str) -> Option<Self> {
        Nutrient::ALL.iter().copied().find(|n| n.key() == key.trim())
    }
}

/// A ratio or index computed from a blended nutrient profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedNutrient {
    #[serde(rename = "MECP_Ratio")]
    EnergyProteinRatio,
    #[serde(rename = "CaAvP_Ratio")]
    CalciumPhosphorusRatio,
    #[serde(rename = "K_Cl_Na_Ratio")]
    ElectrolyteRatio,
    #[serde(rename = "dEB")]
    ElectrolyteBalance,
}

impl DerivedNutrient {
    pub const ALL: [DerivedNutrient; 4] = [
        DerivedNutrient::EnergyProteinRatio,
        DerivedNutrient::CalciumPhosphorusRatio,
        DerivedNutrient::ElectrolyteRatio,
        DerivedNutrient::ElectrolyteBalance,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DerivedNutrient::EnergyProteinRatio => "MECP_Ratio",
            DerivedNutrient::CalciumPhosphorusRatio => "CaAvP_Ratio",
            DerivedNutrient::ElectrolyteRatio => "K_Cl_Na_Ratio",
            DerivedNutrient::ElectrolyteBalance => "dEB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DerivedNutrient::EnergyProteinRatio => "ME/CP Ratio",
            DerivedNutrient::CalciumPhosphorusRatio => "Ca/Av.P Ratio",
            DerivedNutrient::ElectrolyteRatio => "(K+Cl)/Na Ratio",
            DerivedNutrient::ElectrolyteBalance => "dEB (mEq/kg)",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        DerivedNutrient::ALL.iter().copied().find(|d| d.key() == key.trim())
    }

    /// Evaluate against a blended profile.
    ///
    /// Ratios are 0 when their denominator is not positive. dEB is in mEq/kg.
    pub fn compute(&self, profile: &NutrientProfile) -> f64 {
        match self {
            DerivedNutrient::EnergyProteinRatio => {
                guarded_ratio(profile.me_kcal_per_kg, profile.cp_pct)
            }
            DerivedNutrient::CalciumPhosphorusRatio => {
                guarded_ratio(profile.ca_pct, profile.avp_pct)
            }
            DerivedNutrient::ElectrolyteRatio => {
                guarded_ratio(profile.k_pct + profile.cl_pct, profile.na_pct)
            }
            DerivedNutrient::ElectrolyteBalance => {
                434.78 * profile.na_pct + 256.4 * profile.k_pct - 281.69 * profile.cl_pct
            }
        }
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Intrinsic nutrient content of an ingredient or a blended feed.
///
/// Percentages are on a 0-100 scale; energy is kcal/kg; choline is mg/kg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientProfile {
    #[serde(rename = "CP_pct")]
    pub cp_pct: f64,
    #[serde(rename = "ME_kcal_per_kg")]
    pub me_kcal_per_kg: f64,
    #[serde(rename = "Ca_pct")]
    pub ca_pct: f64,
    #[serde(rename = "avP_pct")]
    pub avp_pct: f64,
    #[serde(rename = "phytateP_pct")]
    pub phytate_p_pct: f64,
    #[serde(rename = "Na_pct")]
    pub na_pct: f64,
    #[serde(rename = "K_pct")]
    pub k_pct: f64,
    #[serde(rename = "Cl_pct")]
    pub cl_pct: f64,
    #[serde(rename = "Lys_pct")]
    pub lys_pct: f64,
    #[serde(rename = "TSAA_pct")]
    pub tsaa_pct: f64,
    #[serde(rename = "Thr_pct")]
    pub thr_pct: f64,
    #[serde(rename = "Val_pct")]
    pub val_pct: f64,
    #[serde(rename = "Ile_pct")]
    pub ile_pct: f64,
    #[serde(rename = "Leu_pct")]
    pub leu_pct: f64,
    #[serde(rename = "Arg_pct")]
    pub arg_pct: f64,
    #[serde(rename = "Try_pct")]
    pub try_pct: f64,
    #[serde(rename = "Starch_pct")]
    pub starch_pct: f64,
    #[serde(rename = "CF_pct")]
    pub cf_pct: f64,
    #[serde(rename = "NDF_pct")]
    pub ndf_pct: f64,
    #[serde(rename = "ADF_pct")]
    pub adf_pct: f64,
    #[serde(rename = "Ash_pct")]
    pub ash_pct: f64,
    #[serde(rename = "Choline_mg_per_kg")]
    pub choline_mg_per_kg: f64,
}

impl NutrientProfile {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a profile from values given in `Nutrient::ALL` order
    pub fn from_values(values: [f64; 22]) -> Self {
        let mut profile = Self::zero();
        for (nutrient, value) in Nutrient::ALL.iter().zip(values) {
            *profile.get_mut(*nutrient) = value;
        }
        profile
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::CrudeProtein => self.cp_pct,
            Nutrient::MetabolizableEnergy => self.me_kcal_per_kg,
            Nutrient::Calcium => self.ca_pct,
            Nutrient::AvailablePhosphorus => self.avp_pct,
            Nutrient::PhytatePhosphorus => self.phytate_p_pct,
            Nutrient::Sodium => self.na_pct,
            Nutrient::Potassium => self.k_pct,
            Nutrient::Chlorine => self.cl_pct,
            Nutrient::Lysine => self.lys_pct,
            Nutrient::MethionineCystine => self.tsaa_pct,
            Nutrient::Threonine => self.thr_pct,
            Nutrient::Valine => self.val_pct,
            Nutrient::Isoleucine => self.ile_pct,
            Nutrient::Leucine => self.leu_pct,
            Nutrient::Arginine => self.arg_pct,
            Nutrient::Tryptophan => self.try_pct,
            Nutrient::Starch => self.starch_pct,
            Nutrient::CrudeFiber => self.cf_pct,
            Nutrient::NeutralDetergentFiber => self.ndf_pct,
            Nutrient::AcidDetergentFiber => self.adf_pct,
            Nutrient::Ash => self.ash_pct,
            Nutrient::Choline => self.choline_mg_per_kg,
        }
    }

    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
        match nutrient {
            Nutrient::CrudeProtein => &mut self.cp_pct,
            Nutrient::MetabolizableEnergy => &mut self.me_kcal_per_kg,
            Nutrient::Calcium => &mut self.ca_pct,
            Nutrient::AvailablePhosphorus => &mut self.avp_pct,
            Nutrient::PhytatePhosphorus => &mut self.phytate_p_pct,
            Nutrient::Sodium => &mut self.na_pct,
            Nutrient::Potassium => &mut self.k_pct,
            Nutrient::Chlorine => &mut self.cl_pct,
            Nutrient::Lysine => &mut self.lys_pct,
            Nutrient::MethionineCystine => &mut self.tsaa_pct,
            Nutrient::Threonine => &mut self.thr_pct,
            Nutrient::Valine => &mut self.val_pct,
            Nutrient::Isoleucine => &mut self.ile_pct,
            Nutrient::Leucine => &mut self.leu_pct,
            Nutrient::Arginine => &mut self.arg_pct,
            Nutrient::Tryptophan => &mut self.try_pct,
            Nutrient::Starch => &mut self.starch_pct,
            Nutrient::CrudeFiber => &mut self.cf_pct,
            Nutrient::NeutralDetergentFiber => &mut self.ndf_pct,
            Nutrient::AcidDetergentFiber => &mut self.adf_pct,
            Nutrient::Ash => &mut self.ash_pct,
            Nutrient::Choline => &mut self.choline_mg_per_kg,
        }
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        let mut scaled = Self::zero();
        for nutrient in Nutrient::ALL {
            *scaled.get_mut(nutrient) = self.get(nutrient) * multiplier;
        }
        scaled
    }

    /// Field-wise sum with another profile
    pub fn add(&self, other: &NutrientProfile) -> Self {
        let mut sum = Self::zero();
        for nutrient in Nutrient::ALL {
            *sum.get_mut(nutrient) = self.get(nutrient) + other.get(nutrient);
        }
        sum
    }

    /// True when every field is exactly zero
    pub fn is_zero(&self) -> bool {
        Nutrient::ALL.iter().all(|n| self.get(*n) == 0.0)
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for nutrient in Nutrient::ALL {
            assert_eq!(Nutrient::from_key(nutrient.key()), Some(nutrient));
        }
        for derived in DerivedNutrient::ALL {
            assert_eq!(DerivedNutrient::from_key(derived.key()), Some(derived));
        }
        assert_eq!(Nutrient::from_key("Vitamin_C"), None);
    }

    #[test]
    fn test_serde_name_matches_key() {
        for nutrient in Nutrient::ALL {
            let json = serde_json::to_string(&nutrient).unwrap();
            assert_eq!(json, format!("\"{}\"", nutrient.key()));
        }
    }

    #[test]
    fn test_accessors_cover_every_field() {
        let values: [f64; 22] = std::array::from_fn(|i| (i + 1) as f64);
        let profile = NutrientProfile::from_values(values);
        for (i, nutrient) in Nutrient::ALL.iter().enumerate() {
            assert_eq!(profile.get(*nutrient), (i + 1) as f64);
        }
    }

    #[test]
    fn test_profile_deserializes_missing_fields_as_zero() {
        let profile: NutrientProfile =
            serde_json::from_str(r#"{"CP_pct": 20, "ME_kcal_per_kg": 3000.5}"#).unwrap();
        assert_eq!(profile.cp_pct, 20.0);
        assert_eq!(profile.me_kcal_per_kg, 3000.5);
        assert_eq!(profile.choline_mg_per_kg, 0.0);
    }

    #[test]
    fn test_scale_and_add() {
        let mut a = NutrientProfile::zero();
        a.cp_pct = 10.0;
        a.ca_pct = 1.0;
        let mut b = NutrientProfile::zero();
        b.cp_pct = 20.0;

        let sum = a.scale(0.5) + b * 0.5;
        assert!((sum.cp_pct - 15.0).abs() < 1e-12);
        assert!((sum.ca_pct - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_derived_guards_zero_denominators() {
        let mut profile = NutrientProfile::zero();
        profile.me_kcal_per_kg = 3000.0;
        profile.ca_pct = 1.0;
        profile.k_pct = 0.8;
        profile.cl_pct = 0.2;

        assert_eq!(DerivedNutrient::EnergyProteinRatio.compute(&profile), 0.0);
        assert_eq!(DerivedNutrient::CalciumPhosphorusRatio.compute(&profile), 0.0);
        assert_eq!(DerivedNutrient::ElectrolyteRatio.compute(&profile), 0.0);
    }

    #[test]
    fn test_electrolyte_balance() {
        let mut profile = NutrientProfile::zero();
        profile.na_pct = 0.2;
        profile.k_pct = 0.9;
        profile.cl_pct = 0.25;

        let expected = 434.78 * 0.2 + 256.4 * 0.9 - 281.69 * 0.25;
        let deb = DerivedNutrient::ElectrolyteBalance.compute(&profile);
        assert!((deb - expected).abs() < 1e-9);
        assert!(
            (DerivedNutrient::ElectrolyteRatio.compute(&profile) - (0.9 + 0.25) / 0.2).abs() < 1e-12
        );
    }
}
