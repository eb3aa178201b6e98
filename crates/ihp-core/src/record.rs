//! The registration record and its field catalogue.
//!
//! Fields are declared once, in source-column order. The declaration expands
//! to the record struct, the [`Field`] enum naming each field, and the
//! by-field accessors used by the row mapper and the storage encoder.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  value::{FieldType, Timestamp, Value, ValueKind},
};

macro_rules! registration_record {
  ($( $(#[$doc:meta])* $field:ident : $ty:ty => $variant:ident ),* $(,)?) => {
    /// One disaster-assistance registration, keyed by [`RegistrationRecord::id`].
    ///
    /// Constructed fresh for each source row and never mutated after it has
    /// been handed to a store.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct RegistrationRecord {
      $( $(#[$doc])* pub $field: $ty, )*
    }

    /// Names one field of [`RegistrationRecord`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Field {
      $( $variant, )*
    }

    impl Field {
      /// Every field, in declaration order.
      pub const ALL: &'static [Field] = &[ $( Field::$variant, )* ];

      /// The snake_case field name; also the storage column name.
      pub fn name(self) -> &'static str {
        match self {
          $( Self::$variant => stringify!($field), )*
        }
      }

      pub fn kind(self) -> ValueKind {
        match self {
          $( Self::$variant => <$ty as FieldType>::KIND, )*
        }
      }

      pub fn from_name(name: &str) -> Option<Field> {
        match name {
          $( stringify!($field) => Some(Self::$variant), )*
          _ => None,
        }
      }
    }

    impl RegistrationRecord {
      pub fn get(&self, field: Field) -> Value {
        match field {
          $( Field::$variant => FieldType::into_value(self.$field.clone()), )*
        }
      }

      /// Overwrite one field. Fails if `value` is of the wrong kind.
      pub fn set(&mut self, field: Field, value: Value) -> Result<()> {
        let found = value.kind();
        match field {
          $(
            Field::$variant => {
              self.$field = <$ty as FieldType>::from_value(value).ok_or(
                Error::KindMismatch {
                  field:    field.name(),
                  expected: field.kind(),
                  found,
                },
              )?;
            }
          )*
        }
        Ok(())
      }
    }
  };
}

registration_record! {
  // ── Identity & classification ───────────────────────────────────────────
  incident_type:                   String    => IncidentType,
  declaration_date:                Timestamp => DeclarationDate,
  disaster_number:                 String    => DisasterNumber,
  county:                          String    => County,
  damaged_state_abbreviation:      String    => DamagedStateAbbreviation,
  damaged_city:                    String    => DamagedCity,
  damaged_zip_code:                String    => DamagedZipCode,

  // ── Household ───────────────────────────────────────────────────────────
  /// Age band as published, e.g. `"35-64"`.
  applicant_age:                   String    => ApplicantAge,
  household_composition:           String    => HouseholdComposition,
  occupants_under_two:             String    => OccupantsUnderTwo,
  occupants_2_to_5:                String    => Occupants2To5,
  occupants_6_to_18:               String    => Occupants6To18,
  occupants_19_to_64:              String    => Occupants19To64,
  occupants_65_and_over:           String    => Occupants65AndOver,
  gross_income:                    String    => GrossIncome,
  own_rent:                        String    => OwnRent,
  primary_residence:               bool      => PrimaryResidence,
  residence_type:                  String    => ResidenceType,
  home_owners_insurance:           bool      => HomeOwnersInsurance,
  flood_insurance:                 bool      => FloodInsurance,
  registration_method:             String    => RegistrationMethod,

  // ── Programs & amounts ──────────────────────────────────────────────────
  ihp_referral:                    bool      => IhpReferral,
  ihp_eligible:                    bool      => IhpEligible,
  ihp_amount:                      f64       => IhpAmount,
  fip_amount:                      f64       => FipAmount,
  ha_referral:                     bool      => HaReferral,
  ha_eligible:                     bool      => HaEligible,
  ha_amount:                       f64       => HaAmount,
  ha_status:                       String    => HaStatus,
  ona_referral:                    bool      => OnaReferral,
  ona_eligible:                    bool      => OnaEligible,
  ona_amount:                      f64       => OnaAmount,
  utilities_out:                   bool      => UtilitiesOut,
  home_damage:                     bool      => HomeDamage,
  auto_damage:                     bool      => AutoDamage,
  emergency_needs:                 bool      => EmergencyNeeds,
  food_need:                       bool      => FoodNeed,
  shelter_need:                    bool      => ShelterNeed,
  access_functional_needs:         bool      => AccessFunctionalNeeds,
  sba_eligible:                    bool      => SbaEligible,
  sba_approved:                    bool      => SbaApproved,
  inspn_issued:                    bool      => InspnIssued,
  inspn_returned:                  bool      => InspnReturned,
  habitability_repairs_required:   bool      => HabitabilityRepairsRequired,
  /// Real-property FEMA verified loss.
  rpfvl:                           f64       => Rpfvl,
  /// Personal-property FEMA verified loss.
  ppfvl:                           f64       => Ppfvl,
  renter_damage_level:             String    => RenterDamageLevel,
  destroyed:                       bool      => Destroyed,
  water_level:                     f64       => WaterLevel,
  high_water_location:             String    => HighWaterLocation,
  flood_damage:                    bool      => FloodDamage,
  flood_damage_amount:             f64       => FloodDamageAmount,
  foundation_damage:               bool      => FoundationDamage,
  foundation_damage_amount:        f64       => FoundationDamageAmount,
  roof_damage:                     bool      => RoofDamage,
  roof_damage_amount:              f64       => RoofDamageAmount,
  tsa_eligible:                    bool      => TsaEligible,
  tsa_checked_in:                  bool      => TsaCheckedIn,
  rental_assistance_eligible:      bool      => RentalAssistanceEligible,
  rental_assistance_amount:        f64       => RentalAssistanceAmount,
  repair_assistance_eligible:      bool      => RepairAssistanceEligible,
  repair_amount:                   f64       => RepairAmount,
  replacement_assistance_eligible: bool      => ReplacementAssistanceEligible,
  replacement_amount:              f64       => ReplacementAmount,
  personal_property_eligible:      bool      => PersonalPropertyEligible,
  personal_property_amount:        f64       => PersonalPropertyAmount,
  ihp_max:                         bool      => IhpMax,
  ha_max:                          bool      => HaMax,
  ona_max:                         bool      => OnaMax,

  // ── Audit & identity ────────────────────────────────────────────────────
  last_refresh:                    Timestamp => LastRefresh,
  /// Unique registration identifier; the primary key in every store.
  id:                              String    => Id,
}
