//! The positional column layout of the source extract.
//!
//! Source rows carry no usable names; cell *n* means whatever the layout says
//! it means. The layout is the single place that says so, and it is
//! versioned so a change in the upstream export shows up as one reviewable
//! diff.

use std::collections::HashSet;

use crate::{
  Error, Result,
  coerce::{Coercer, CoercionMode},
  record::Field,
};

/// Maps one source column to one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
  /// Zero-based position in the source row.
  pub index:   usize,
  /// Header text the upstream export uses for this column. Informational:
  /// mapping is by `index` only.
  pub header:  &'static str,
  pub field:   Field,
  pub coercer: Coercer,
  pub mode:    CoercionMode,
}

impl ColumnSpec {
  const fn new(
    index: usize,
    header: &'static str,
    field: Field,
    coercer: Coercer,
    mode: CoercionMode,
  ) -> Self {
    Self { index, header, field, coercer, mode }
  }

  const fn text(index: usize, header: &'static str, field: Field) -> Self {
    Self::new(index, header, field, Coercer::Text, CoercionMode::Required)
  }

  const fn timestamp(index: usize, header: &'static str, field: Field) -> Self {
    Self::new(index, header, field, Coercer::Timestamp, CoercionMode::Required)
  }

  const fn float(index: usize, header: &'static str, field: Field) -> Self {
    Self::new(index, header, field, Coercer::Float, CoercionMode::Required)
  }

  const fn flag(index: usize, header: &'static str, field: Field) -> Self {
    Self::new(index, header, field, Coercer::Flag, CoercionMode::BestEffort)
  }
}

/// A named, versioned, ordered list of [`ColumnSpec`]s.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
  pub name:    &'static str,
  pub version: u32,
  pub columns: &'static [ColumnSpec],
}

/// A header cell that does not carry the name the layout expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMismatch {
  pub index:    usize,
  pub expected: &'static str,
  /// `None` when the header row is too short to have this column.
  pub found:    Option<String>,
}

impl ColumnLayout {
  /// Number of cells every source row must have.
  pub fn width(&self) -> usize { self.columns.len() }

  pub fn column_for(&self, field: Field) -> Option<&ColumnSpec> {
    self.columns.iter().find(|c| c.field == field)
  }

  /// Check the layout is usable: one column per position starting at zero,
  /// every record field mapped exactly once, and each coercer producing the
  /// kind its field stores.
  pub fn validate(&self) -> Result<()> {
    let invalid = |reason: String| Error::InvalidLayout {
      layout: self.name,
      version: self.version,
      reason,
    };

    let mut seen = HashSet::new();
    for (position, column) in self.columns.iter().enumerate() {
      if column.index != position {
        return Err(invalid(format!(
          "column at position {position} declares index {}",
          column.index
        )));
      }
      if !seen.insert(column.field) {
        return Err(invalid(format!(
          "field {} is mapped more than once",
          column.field.name()
        )));
      }
      if column.coercer.output() != column.field.kind() {
        return Err(invalid(format!(
          "column {} coerces to {:?} but {} stores {:?}",
          column.index,
          column.coercer.output(),
          column.field.name(),
          column.field.kind()
        )));
      }
    }

    if let Some(missing) = Field::ALL.iter().find(|f| !seen.contains(f)) {
      return Err(invalid(format!("field {} is not mapped", missing.name())));
    }

    if self
      .column_for(Field::Id)
      .is_some_and(|c| c.mode != CoercionMode::Required)
    {
      return Err(invalid("the id column must be required".into()));
    }

    Ok(())
  }

  /// Compare a header row against the declared header names,
  /// case-insensitively. Extra trailing header cells are ignored.
  pub fn check_header<S: AsRef<str>>(&self, header: &[S]) -> Vec<HeaderMismatch> {
    self
      .columns
      .iter()
      .filter_map(|column| {
        let found = header.get(column.index).map(|h| h.as_ref().trim());
        match found {
          Some(h) if h.eq_ignore_ascii_case(column.header) => None,
          _ => Some(HeaderMismatch {
            index:    column.index,
            expected: column.header,
            found:    found.map(str::to_owned),
          }),
        }
      })
      .collect()
  }
}

// ─── IHP v1 ──────────────────────────────────────────────────────────────────

use crate::record::Field as F;

/// Layout of the FEMA "Individuals and Households Program – Valid
/// Registrations" export: 71 columns, id last.
pub static IHP_V1: ColumnLayout = ColumnLayout {
  name:    "ihp-valid-registrations",
  version: 1,
  columns: &[
    ColumnSpec::text(0, "incidentType", F::IncidentType),
    ColumnSpec::timestamp(1, "declarationDate", F::DeclarationDate),
    ColumnSpec::text(2, "disasterNumber", F::DisasterNumber),
    ColumnSpec::text(3, "county", F::County),
    ColumnSpec::text(4, "damagedStateAbbreviation", F::DamagedStateAbbreviation),
    ColumnSpec::text(5, "damagedCity", F::DamagedCity),
    ColumnSpec::text(6, "damagedZipCode", F::DamagedZipCode),
    ColumnSpec::text(7, "applicantAge", F::ApplicantAge),
    ColumnSpec::text(8, "householdComposition", F::HouseholdComposition),
    ColumnSpec::text(9, "occupantsUnderTwo", F::OccupantsUnderTwo),
    ColumnSpec::text(10, "occupants2to5", F::Occupants2To5),
    ColumnSpec::text(11, "occupants6to18", F::Occupants6To18),
    ColumnSpec::text(12, "occupants19to64", F::Occupants19To64),
    ColumnSpec::text(13, "occupants65andOver", F::Occupants65AndOver),
    ColumnSpec::text(14, "grossIncome", F::GrossIncome),
    ColumnSpec::text(15, "ownRent", F::OwnRent),
    ColumnSpec::flag(16, "primaryResidence", F::PrimaryResidence),
    ColumnSpec::text(17, "residenceType", F::ResidenceType),
    ColumnSpec::flag(18, "homeOwnersInsurance", F::HomeOwnersInsurance),
    ColumnSpec::flag(19, "floodInsurance", F::FloodInsurance),
    ColumnSpec::text(20, "registrationMethod", F::RegistrationMethod),
    ColumnSpec::flag(21, "ihpReferral", F::IhpReferral),
    ColumnSpec::flag(22, "ihpEligible", F::IhpEligible),
    ColumnSpec::float(23, "ihpAmount", F::IhpAmount),
    ColumnSpec::float(24, "fipAmount", F::FipAmount),
    ColumnSpec::flag(25, "haReferral", F::HaReferral),
    ColumnSpec::flag(26, "haEligible", F::HaEligible),
    ColumnSpec::float(27, "haAmount", F::HaAmount),
    ColumnSpec::text(28, "haStatus", F::HaStatus),
    ColumnSpec::flag(29, "onaReferral", F::OnaReferral),
    ColumnSpec::flag(30, "onaEligible", F::OnaEligible),
    ColumnSpec::float(31, "onaAmount", F::OnaAmount),
    ColumnSpec::flag(32, "utilitiesOut", F::UtilitiesOut),
    ColumnSpec::flag(33, "homeDamage", F::HomeDamage),
    ColumnSpec::flag(34, "autoDamage", F::AutoDamage),
    ColumnSpec::flag(35, "emergencyNeeds", F::EmergencyNeeds),
    ColumnSpec::flag(36, "foodNeed", F::FoodNeed),
    ColumnSpec::flag(37, "shelterNeed", F::ShelterNeed),
    ColumnSpec::flag(38, "accessFunctionalNeeds", F::AccessFunctionalNeeds),
    ColumnSpec::flag(39, "sbaEligible", F::SbaEligible),
    ColumnSpec::flag(40, "sbaApproved", F::SbaApproved),
    ColumnSpec::flag(41, "inspnIssued", F::InspnIssued),
    ColumnSpec::flag(42, "inspnReturned", F::InspnReturned),
    ColumnSpec::flag(43, "habitabilityRepairsRequired", F::HabitabilityRepairsRequired),
    ColumnSpec::float(44, "rpfvl", F::Rpfvl),
    ColumnSpec::float(45, "ppfvl", F::Ppfvl),
    ColumnSpec::text(46, "renterDamageLevel", F::RenterDamageLevel),
    ColumnSpec::flag(47, "destroyed", F::Destroyed),
    ColumnSpec::float(48, "waterLevel", F::WaterLevel),
    ColumnSpec::text(49, "highWaterLocation", F::HighWaterLocation),
    ColumnSpec::flag(50, "floodDamage", F::FloodDamage),
    ColumnSpec::float(51, "floodDamageAmount", F::FloodDamageAmount),
    ColumnSpec::flag(52, "foundationDamage", F::FoundationDamage),
    ColumnSpec::float(53, "foundationDamageAmount", F::FoundationDamageAmount),
    ColumnSpec::flag(54, "roofDamage", F::RoofDamage),
    ColumnSpec::float(55, "roofDamageAmount", F::RoofDamageAmount),
    ColumnSpec::flag(56, "tsaEligible", F::TsaEligible),
    ColumnSpec::flag(57, "tsaCheckedIn", F::TsaCheckedIn),
    ColumnSpec::flag(58, "rentalAssistanceEligible", F::RentalAssistanceEligible),
    ColumnSpec::float(59, "rentalAssistanceAmount", F::RentalAssistanceAmount),
    ColumnSpec::flag(60, "repairAssistanceEligible", F::RepairAssistanceEligible),
    ColumnSpec::float(61, "repairAmount", F::RepairAmount),
    ColumnSpec::flag(62, "replacementAssistanceEligible", F::ReplacementAssistanceEligible),
    ColumnSpec::float(63, "replacementAmount", F::ReplacementAmount),
    ColumnSpec::flag(64, "personalPropertyEligible", F::PersonalPropertyEligible),
    ColumnSpec::float(65, "personalPropertyAmount", F::PersonalPropertyAmount),
    ColumnSpec::flag(66, "ihpMax", F::IhpMax),
    ColumnSpec::flag(67, "haMax", F::HaMax),
    ColumnSpec::flag(68, "onaMax", F::OnaMax),
    ColumnSpec::timestamp(69, "lastRefresh", F::LastRefresh),
    ColumnSpec::text(70, "id", F::Id),
  ],
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ihp_v1_is_valid() {
    IHP_V1.validate().unwrap();
    assert_eq!(IHP_V1.width(), 71);
  }

  #[test]
  fn ihp_v1_documented_positions() {
    assert_eq!(IHP_V1.columns[2].field, Field::DisasterNumber);
    assert_eq!(IHP_V1.columns[23].field, Field::IhpAmount);
    assert_eq!(IHP_V1.columns[32].field, Field::UtilitiesOut);
    assert_eq!(IHP_V1.columns[64].field, Field::PersonalPropertyEligible);
    assert_eq!(IHP_V1.columns[70].field, Field::Id);
  }

  #[test]
  fn flags_are_best_effort_everything_else_required() {
    for column in IHP_V1.columns {
      let expected = if column.coercer == Coercer::Flag {
        CoercionMode::BestEffort
      } else {
        CoercionMode::Required
      };
      assert_eq!(column.mode, expected, "{}", column.header);
    }
  }

  static GAPPED: ColumnLayout = ColumnLayout {
    name:    "gapped",
    version: 1,
    columns: &[
      ColumnSpec::text(0, "a", Field::IncidentType),
      ColumnSpec::text(2, "b", Field::County),
    ],
  };

  #[test]
  fn validate_rejects_gaps() {
    let err = GAPPED.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidLayout { version: 1, .. }));
    assert!(err.to_string().contains("declares index 2"));
  }

  static WRONG_KIND: ColumnLayout = ColumnLayout {
    name:    "wrong-kind",
    version: 3,
    columns: &[ColumnSpec::float(0, "id", Field::Id)],
  };

  #[test]
  fn validate_rejects_kind_mismatch() {
    let err = WRONG_KIND.validate().unwrap_err();
    assert!(err.to_string().contains("coerces to Float"));
  }

  static INCOMPLETE: ColumnLayout = ColumnLayout {
    name:    "incomplete",
    version: 1,
    columns: &[ColumnSpec::text(0, "id", Field::Id)],
  };

  #[test]
  fn validate_rejects_unmapped_fields() {
    let err = INCOMPLETE.validate().unwrap_err();
    assert!(err.to_string().contains("incident_type is not mapped"));
  }

  #[test]
  fn header_matches_case_insensitively() {
    let header: Vec<String> = IHP_V1
      .columns
      .iter()
      .map(|c| c.header.to_uppercase())
      .collect();
    assert!(IHP_V1.check_header(&header).is_empty());
  }

  #[test]
  fn header_drift_is_reported() {
    let mut header: Vec<&str> = IHP_V1.columns.iter().map(|c| c.header).collect();
    header[23] = "ihpAmountTotal";
    header.truncate(70);

    let drift = IHP_V1.check_header(&header);
    assert_eq!(drift, vec![
      HeaderMismatch {
        index:    23,
        expected: "ihpAmount",
        found:    Some("ihpAmountTotal".into()),
      },
      HeaderMismatch { index: 70, expected: "id", found: None },
    ]);
  }
}
