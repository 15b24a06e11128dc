mod common;

use common::*;
use octofhir_vmr::internal::{self, FactType, InternalStatement};
use octofhir_vmr::schema;
use octofhir_vmr::*;

/// Ancestor that accepts inbound mapping and reports improper usage
/// outbound.
struct FailingEncounterMapper;

impl FieldMapper for FailingEncounterMapper {
    type External = schema::EncounterBase;
    type Internal = internal::EncounterBase;

    fn pull_in_fields(
        &self,
        _source: &Self::External,
        _target: &mut Self::Internal,
        _subject_person_id: &str,
        _focal_person_id: &str,
        _context: &mut MappingContext,
    ) -> Result<()> {
        Ok(())
    }

    fn push_out_fields(
        &self,
        _source: &Self::Internal,
        _target: &mut Self::External,
    ) -> Result<()> {
        Err(VmrMappingError::improper_usage(
            "encounter ancestor called out of order",
        ))
    }
}

#[test]
fn test_criticality_only_source() {
    init_tracing();
    let mut context = MappingContext::new(&MappingConfig::default());
    let source = schema::AppointmentRequest {
        criticality: Some(schema::Cd::new("HIGH", "2.16.840.1.113883.5.1063")),
        ..Default::default()
    };

    let id = AppointmentRequestMapper::new()
        .pull_in(
            Some(&source),
            Default::default(),
            PATIENT_ID,
            PATIENT_ID,
            &mut context,
        )
        .unwrap()
        .unwrap();

    let facts = context.into_facts();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts.get(FactType::AppointmentRequest).len(), 1);

    let request = facts
        .get_as::<internal::AppointmentRequest>()
        .next()
        .unwrap();
    assert_eq!(request.id(), id);
    assert!(
        request
            .criticality
            .as_ref()
            .unwrap()
            .matches("HIGH", "2.16.840.1.113883.5.1063")
    );
    assert_eq!(request.requested_appointment_time, None);
    assert_eq!(request.request_issuance_time, None);
    assert_eq!(request.repeat_number, None);
    assert_eq!(request.encounter.encounter_type, None);
    assert_eq!(request.encounter.statement.evaluated_person_id, PATIENT_ID);
    assert!(request.encounter.statement.subject_is_focal_person);
}

#[test]
fn test_absent_source_registers_nothing() {
    let mut context = MappingContext::new(&MappingConfig::default());
    let id = AppointmentRequestMapper::new()
        .pull_in(None, Default::default(), PATIENT_ID, PATIENT_ID, &mut context)
        .unwrap();

    assert_eq!(id, None);
    assert!(context.facts.is_empty());
    assert_eq!(context.mapping_stats.facts_registered, 0);
}

#[test]
fn test_absent_internal_pushes_out_nothing() {
    let facts = FactLists::new();
    let mut results = OrganizedResults::new(&facts, &MappingConfig::default());
    let node = AppointmentRequestMapper::new()
        .push_out(None, &mut results)
        .unwrap();

    assert_eq!(node, None);
    assert!(results.output().vmr_output.patient.is_none());
}

#[test]
fn test_full_request_round_trip() {
    let mut context = MappingContext::new(&MappingConfig::default());
    let source = create_test_appointment_request("2.16.840.1.113883.3.795.5.2.12.2");
    AppointmentRequestMapper::new()
        .pull_in(
            Some(&source),
            Default::default(),
            PATIENT_ID,
            PATIENT_ID,
            &mut context,
        )
        .unwrap();
    let facts = context.into_facts();
    let original = facts
        .get_as::<internal::AppointmentRequest>()
        .next()
        .unwrap()
        .clone();
    assert_eq!(original.repeat_number, Some(1));

    let mut results = OrganizedResults::new(&facts, &MappingConfig::default());
    let node = AppointmentRequestMapper::new()
        .push_out(Some(&original), &mut results)
        .unwrap()
        .unwrap();

    let mut context = MappingContext::new(&MappingConfig::default());
    AppointmentRequestMapper::new()
        .pull_in(
            Some(&node),
            Default::default(),
            PATIENT_ID,
            PATIENT_ID,
            &mut context,
        )
        .unwrap();
    let facts = context.into_facts();
    let reread = facts
        .get_as::<internal::AppointmentRequest>()
        .next()
        .unwrap();

    assert_eq!(reread, &original);
}

#[test]
fn test_ancestor_improper_usage_is_fatal() {
    init_tracing();
    let request = create_test_internal_request("req-1");

    let facts = FactLists::new();
    let mut results = OrganizedResults::new(&facts, &MappingConfig::default());
    let err = AppointmentRequestMapper::with_ancestor(FailingEncounterMapper)
        .push_out(Some(&request), &mut results)
        .unwrap_err();

    assert!(!err.is_recoverable());
    assert!(!err.is_improper_usage());
    assert!(matches!(err, VmrMappingError::Fatal { .. }));
    let message = err.to_string();
    assert!(message.contains("AppointmentRequestMapper::push_out"));
    assert!(message.contains("encounter ancestor called out of order"));
}

#[test]
fn test_missing_id_is_wrapped_by_concrete_mapper() {
    // The base mapper reports the missing id itself; a concrete mapper wraps it.
    let request = internal::AppointmentRequest::default();
    let facts = FactLists::new();
    let mut results = OrganizedResults::new(&facts, &MappingConfig::default());

    let err = EncounterBaseMapper::new()
        .push_out_fields(&request.encounter, &mut schema::EncounterBase::default())
        .unwrap_err();
    assert!(err.is_improper_usage());

    let err = AppointmentRequestMapper::new()
        .push_out(Some(&request), &mut results)
        .unwrap_err();
    assert!(matches!(err, VmrMappingError::Fatal { .. }));
}

#[test]
fn test_malformed_time_is_data_format() {
    let mut context = MappingContext::new(&MappingConfig::default());
    let mut source = create_test_appointment_request("req-1");
    source.requested_appointment_time = Some(schema::IvlTs::new("2024-03-01", "20240315"));

    let err = AppointmentRequestMapper::new()
        .pull_in(
            Some(&source),
            Default::default(),
            PATIENT_ID,
            PATIENT_ID,
            &mut context,
        )
        .unwrap_err();

    assert!(matches!(err, VmrMappingError::DataFormat { .. }));
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("requestedAppointmentTime"));
}

#[test]
fn test_inverted_interval_is_invalid_data() {
    let mut context = MappingContext::new(&MappingConfig::default());
    let mut source = create_test_appointment_request("req-1");
    source.requested_appointment_time = Some(schema::IvlTs::new("20240315", "20240301"));

    let err = AppointmentRequestMapper::new()
        .pull_in(
            Some(&source),
            Default::default(),
            PATIENT_ID,
            PATIENT_ID,
            &mut context,
        )
        .unwrap_err();

    assert!(matches!(err, VmrMappingError::InvalidData { .. }));
}

#[test]
fn test_empty_subject_through_concrete_mapper_is_fatal() {
    let mut context = MappingContext::new(&MappingConfig::default());
    let source = create_test_appointment_request("req-1");

    let err = AppointmentRequestMapper::new()
        .pull_in(Some(&source), Default::default(), "", "", &mut context)
        .unwrap_err();

    assert!(!err.is_recoverable());
    assert!(context.facts.is_empty());
}
