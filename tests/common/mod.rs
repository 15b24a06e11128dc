use octofhir_vmr::internal;
use octofhir_vmr::schema::*;

pub const PATIENT_ROOT: &str = "2.16.840.1.113883.3.795.5.2.1.1";
pub const PATIENT_EXTENSION: &str = "patient-1";
pub const PATIENT_ID: &str = "2.16.840.1.113883.3.795.5.2.1.1^patient-1";

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn create_test_patient() -> EvaluatedPerson {
    EvaluatedPerson {
        id: Some(Ii::new(PATIENT_ROOT).with_extension(PATIENT_EXTENSION)),
        demographics: Some(Demographics {
            birth_time: Some(Ts::new("19750312")),
            gender: Some(Cd::new("F", "2.16.840.1.113883.5.1").with_display_name("Female")),
        }),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn create_test_input(statements: ClinicalStatements) -> CdsInput {
    let mut patient = create_test_patient();
    patient.clinical_statements = Some(statements);
    CdsInput {
        vmr_input: VmrInput {
            patient: Some(patient),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn create_test_statement(id: &str) -> ClinicalStatement {
    ClinicalStatement {
        id: Some(Ii::new(id)),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn create_test_appointment_request(id: &str) -> AppointmentRequest {
    AppointmentRequest {
        encounter: EncounterBase {
            statement: create_test_statement(id),
            encounter_type: Some(Cd::new("185349003", "2.16.840.1.113883.6.96")),
        },
        criticality: Some(Cd::new("HIGH", "2.16.840.1.113883.5.1063")),
        requested_appointment_time: Some(IvlTs::new("20240301", "20240315")),
        request_issuance_time: Some(IvlTs::new("20240220093000", "20240220093000")),
        repeat_number: Some(Int::new(1)),
    }
}

#[allow(dead_code)]
pub fn create_test_encounter_event(id: &str) -> EncounterEvent {
    EncounterEvent {
        encounter: EncounterBase {
            statement: create_test_statement(id),
            encounter_type: Some(Cd::new("AMB", "2.16.840.1.113883.5.4")),
        },
        encounter_event_time: Some(IvlTs::new("20240110080000", "20240110091500")),
    }
}

#[allow(dead_code)]
pub fn create_test_observation_result(id: &str, value: i64) -> ObservationResult {
    ObservationResult {
        observation: ObservationBase {
            statement: create_test_statement(id),
            observation_focus: Some(Cd::new("8480-6", "2.16.840.1.113883.6.1")),
            observation_method: None,
        },
        observation_event_time: Some(IvlTs::new("20240110081000", "20240110081000")),
        observation_value: Some(ObservationValue {
            integer: Some(Int::new(value)),
            ..Default::default()
        }),
        interpretation: vec![Cd::new("H", "2.16.840.1.113883.5.83")],
    }
}

#[allow(dead_code)]
pub fn create_test_person(id: &str, name: &str) -> Person {
    Person {
        entity: EntityBase {
            id: Some(Ii::new(id)),
            ..Default::default()
        },
        name: Some(name.to_string()),
        birth_time: None,
    }
}

#[allow(dead_code)]
pub fn create_test_organization(id: &str, name: &str) -> Organization {
    Organization {
        entity: EntityBase {
            id: Some(Ii::new(id)),
            ..Default::default()
        },
        name: Some(name.to_string()),
    }
}

#[allow(dead_code)]
pub fn relationship_code(code: &str) -> Cd {
    Cd::new(code, "2.16.840.1.113883.3.795.12.3.2")
}

/// Internal evaluated person plus an appointment request fact, flagged for
/// return.
#[allow(dead_code)]
pub fn create_test_internal_request(id: &str) -> internal::AppointmentRequest {
    let mut statement = internal::ClinicalStatement::new(id, PATIENT_ID);
    statement.subject_is_focal_person = true;
    statement.to_be_returned = true;
    internal::AppointmentRequest {
        encounter: internal::EncounterBase {
            statement,
            encounter_type: None,
        },
        criticality: Some(internal::Cd::new("HIGH", "2.16.840.1.113883.5.1063")),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn create_test_internal_person() -> internal::EvaluatedPerson {
    internal::EvaluatedPerson {
        id: PATIENT_ID.to_string(),
        ..Default::default()
    }
}
