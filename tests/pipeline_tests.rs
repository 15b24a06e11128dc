mod common;

use common::*;
use octofhir_vmr::internal::{self, Fact, FactType};
use octofhir_vmr::schema::{self, ClinicalStatements, StatementCategory};
use octofhir_vmr::*;

const INPUT_JSON: &str = r#"{
  "templateId": [{ "root": "2.16.840.1.113883.3.1829.11.1.1.1" }],
  "vmrInput": {
    "patient": {
      "id": { "root": "2.16.840.1.113883.3.795.5.2.1.1", "extension": "patient-1" },
      "demographics": {
        "birthTime": { "value": "19750312" },
        "gender": { "code": "F", "codeSystem": "2.16.840.1.113883.5.1" }
      },
      "clinicalStatements": {
        "encounterEvents": [
          {
            "id": { "root": "1.2.3", "extension": "enc-1" },
            "encounterType": { "code": "AMB", "codeSystem": "2.16.840.1.113883.5.4" },
            "encounterEventTime": {
              "low": { "value": "20240110080000-0500" },
              "high": { "value": "20240110091500-0500" }
            }
          }
        ],
        "observationResults": [
          {
            "id": { "root": "1.2.3", "extension": "obs-1" },
            "observationFocus": { "code": "8480-6", "codeSystem": "2.16.840.1.113883.6.1" },
            "observationValue": { "boolean": { "value": true } }
          },
          {
            "id": { "root": "1.2.3", "extension": "obs-2" },
            "observationFocus": { "code": "8462-4", "codeSystem": "2.16.840.1.113883.6.1" },
            "observationValue": { "integer": { "value": 85 } }
          }
        ]
      }
    }
  }
}"#;

#[test]
fn test_json_pull_in() {
    init_tracing();
    let facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();

    assert_eq!(
        facts.fact_types(),
        vec![
            FactType::EvaluatedPerson,
            FactType::EncounterEvent,
            FactType::ObservationResult,
        ]
    );

    let person = facts.get_as::<internal::EvaluatedPerson>().next().unwrap();
    assert_eq!(person.id, PATIENT_ID);
    assert!(person.gender.as_ref().unwrap().matches("F", "2.16.840.1.113883.5.1"));

    let encounter = facts.get_as::<internal::EncounterEvent>().next().unwrap();
    let time = encounter.encounter_event_time.as_ref().unwrap();
    // Offsets are normalised to UTC.
    assert_eq!(
        time.low.unwrap().format("%Y%m%d%H%M%S").to_string(),
        "20240110130000"
    );
    assert_eq!(encounter.encounter.statement.id, "1.2.3^enc-1");
    assert_eq!(encounter.encounter.statement.evaluated_person_id, PATIENT_ID);
}

#[test]
fn test_registry_preserves_insertion_order() {
    let facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();
    let ids: Vec<_> = facts
        .get(FactType::ObservationResult)
        .iter()
        .filter_map(Fact::id)
        .collect();
    assert_eq!(ids, vec!["1.2.3^obs-1", "1.2.3^obs-2"]);
}

#[test]
fn test_registry_lookup_by_id() {
    let facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();
    let fact = facts.find_by_id("1.2.3^obs-2").unwrap();
    assert_eq!(fact.fact_type(), FactType::ObservationResult);
    assert!(facts.find_by_id("1.2.3^obs-3").is_none());
    assert!(facts.get(FactType::Person).is_empty());
}

#[test]
fn test_malformed_json_is_serialization_error() {
    let err = VmrMapper::new().pull_in_json("{ not json").unwrap_err();
    assert!(matches!(err, VmrMappingError::Serialization(_)));
}

#[test]
fn test_push_out_returns_only_flagged_statements() {
    let mut facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();
    facts.statement_mut("1.2.3^obs-2").unwrap().to_be_returned = true;

    let output = VmrMapper::new().push_out(&facts).unwrap();
    let patient = output.vmr_output.patient.unwrap();
    assert_eq!(
        patient.id,
        Some(
            octofhir_vmr::schema::Ii::new(PATIENT_ROOT).with_extension(PATIENT_EXTENSION)
        )
    );

    let statements = patient.clinical_statements.unwrap();
    for category in StatementCategory::all() {
        let expected = (*category == StatementCategory::ObservationResults).then_some(1);
        assert_eq!(statements.container_len(*category), expected, "{category}");
    }
    let results = statements.observation_results.unwrap();
    assert_eq!(
        results[0].observation_value.as_ref().unwrap().integer,
        Some(octofhir_vmr::schema::Int::new(85))
    );
}

#[test]
fn test_push_out_without_flags_creates_no_containers() {
    let facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();
    let output = VmrMapper::new().push_out(&facts).unwrap();
    let patient = output.vmr_output.patient.unwrap();
    assert!(patient.clinical_statements.is_none());
    assert!(patient.demographics.is_some());
}

#[test]
fn test_push_out_everything_when_flags_are_ignored() {
    let facts = VmrMapper::new().pull_in_json(INPUT_JSON).unwrap();
    let mapper = VmrMapper::with_config(MappingConfig::default().with_return_only_flagged(false));
    let output = mapper.push_out(&facts).unwrap();

    let statements: ClinicalStatements = output
        .vmr_output
        .patient
        .unwrap()
        .clinical_statements
        .unwrap();
    assert_eq!(statements.container_len(StatementCategory::EncounterEvents), Some(1));
    assert_eq!(statements.container_len(StatementCategory::ObservationResults), Some(2));
    assert!(!statements.has_container(StatementCategory::AppointmentRequests));
}

#[test]
fn test_json_round_trip_preserves_values() {
    let mapper = VmrMapper::with_config(MappingConfig::default().with_return_only_flagged(false));
    let facts = mapper.pull_in_json(INPUT_JSON).unwrap();
    let json = mapper.push_out_json(&facts).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let events = &value["vmrOutput"]["patient"]["clinicalStatements"]["encounterEvents"];
    assert_eq!(events[0]["encounterEventTime"]["low"]["value"], "20240110130000");
    assert_eq!(events[0]["id"]["extension"], "enc-1");

    let observations = &value["vmrOutput"]["patient"]["clinicalStatements"]["observationResults"];
    assert_eq!(observations[0]["observationValue"]["boolean"]["value"], true);
    assert!(observations[0]["observationValue"].get("integer").is_none());
}

#[test]
fn test_strict_config_requires_ids() {
    let json = INPUT_JSON.replace(r#""id": { "root": "1.2.3", "extension": "enc-1" },"#, "");
    let facts = VmrMapper::new().pull_in_json(&json).unwrap();
    assert_eq!(facts.get(FactType::EncounterEvent).len(), 1);

    let err = VmrMapper::with_config(MappingConfig::strict())
        .pull_in_json(&json)
        .unwrap_err();
    assert!(matches!(err, VmrMappingError::InvalidData { .. }));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mapper = VmrMapper::with_config(MappingConfig::default().with_max_nesting_depth(0));
    assert!(mapper.pull_in_json(INPUT_JSON).is_err());
}

#[test]
fn test_non_statement_fact_has_no_output_category() {
    let facts = FactLists::new();
    let mut results = OrganizedResults::new(&facts, &MappingConfig::default());
    let person = Fact::Person(internal::Person::default());

    let err = NestedObjectsMapper::push_out_root_statement(&person, &mut results).unwrap_err();
    assert!(matches!(err, VmrMappingError::Fatal { .. }));
    assert!(!results.has_container(StatementCategory::AppointmentRequests));
}

#[test]
fn test_container_created_once_for_many_statements() {
    let mut facts = FactLists::new();
    facts.put(create_test_internal_person());
    for id in ["req-1", "req-2", "req-3"] {
        facts.put(create_test_internal_request(id));
    }

    let output = VmrMapper::new().push_out(&facts).unwrap();
    let requests = output
        .vmr_output
        .patient
        .unwrap()
        .clinical_statements
        .unwrap()
        .appointment_requests
        .unwrap();
    let ids: Vec<_> = requests
        .iter()
        .map(|request| request.encounter.statement.id.as_ref().unwrap().root.clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            Some("req-1".to_string()),
            Some("req-2".to_string()),
            Some("req-3".to_string())
        ]
    );
}

#[test]
fn test_statement_container_without_mapper_is_fatal() {
    let json = INPUT_JSON.replace(
        r#""encounterEvents": ["#,
        r#""procedureEvents": [{ "id": { "root": "1.2.3", "extension": "proc-1" } }],
        "encounterEvents": ["#,
    );

    let err = VmrMapper::new().pull_in_json(&json).unwrap_err();
    assert!(matches!(err, VmrMappingError::Fatal { .. }));
    assert!(!err.is_recoverable());
    assert!(err.to_string().contains("procedureEvents"));
}

#[test]
fn test_null_unknown_container_is_ignored() {
    let json = INPUT_JSON.replace(
        r#""encounterEvents": ["#,
        r#""procedureEvents": null,
        "encounterEvents": ["#,
    );

    let facts = VmrMapper::new().pull_in_json(&json).unwrap();
    assert_eq!(facts.get(FactType::ObservationResult).len(), 2);
}

#[test]
fn test_nested_statement_without_mapper_is_fatal() {
    let json = INPUT_JSON.replace(
        r#""observationValue": { "integer": { "value": 85 } }"#,
        r#""observationValue": { "integer": { "value": 85 } },
            "relatedClinicalStatement": [
              {
                "targetRelationshipToSource": { "code": "COMP", "codeSystem": "rel" },
                "observationResult": {
                  "id": { "root": "1.2.3", "extension": "obs-3" },
                  "observationValue": { "integer": { "value": 70 } }
                },
                "procedureEvent": { "id": { "root": "1.2.3", "extension": "proc-1" } }
              }
            ]"#,
    );

    let err = VmrMapper::new().pull_in_json(&json).unwrap_err();
    assert!(matches!(err, VmrMappingError::Fatal { .. }));
    assert!(err.to_string().contains("procedureEvent"));
}

#[test]
fn test_duplicate_statement_ids_are_rejected_inbound() {
    let mut first = create_test_appointment_request("dup");
    let mut child_a = schema::RelatedClinicalStatement::new(relationship_code("REASON"));
    child_a.encounter_event = Some(create_test_encounter_event("child-a"));
    first.encounter.statement.related_clinical_statement.push(child_a);

    let mut second = create_test_appointment_request("dup");
    let mut child_b = schema::RelatedClinicalStatement::new(relationship_code("REASON"));
    child_b.encounter_event = Some(create_test_encounter_event("child-b"));
    second.encounter.statement.related_clinical_statement.push(child_b);

    let input = create_test_input(ClinicalStatements {
        appointment_requests: Some(vec![first, second]),
        ..Default::default()
    });
    let err = VmrMapper::new().pull_in(&input).unwrap_err();
    assert!(matches!(err, VmrMappingError::InvalidData { .. }));
    assert!(err.to_string().contains("'dup'"));
}

#[test]
fn test_duplicate_ids_in_facts_are_rejected_outbound() {
    let mut facts = FactLists::new();
    facts.put(create_test_internal_person());
    facts.put(create_test_internal_request("dup"));
    facts.put(create_test_internal_request("dup"));

    let err = VmrMapper::new().push_out(&facts).unwrap_err();
    assert!(matches!(err, VmrMappingError::InvalidData { .. }));
    assert!(err.to_string().contains("'dup'"));
}
