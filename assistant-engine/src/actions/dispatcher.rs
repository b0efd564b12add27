use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ActionCall, ActionFailure, ActionResult, AssistantAction, CREATE_TRIAGE, REQUEST_APPOINTMENT};
use crate::models::{
    AppointmentRequest, AppointmentType, AppointmentUrgency, PatientProfile, RequestStatus, TriageCase,
    TriageSource, TriageUrgency,
};
use crate::store::{CareActions, StoreResult};

const DEFAULT_DEPARTMENT: &str = "General Practice";

/// Executes action calls against the care collaborators.
///
/// Action-level problems (unknown name, missing parameter, no hospital link)
/// become `ActionResult { success: false }`. Store errors are returned as
/// `Err` and abort the turn.
#[derive(Debug, Clone, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Execute `calls` one at a time, in order
    pub async fn dispatch_all<T>(
        &self,
        store: &mut T,
        patient: &PatientProfile,
        calls: &[ActionCall],
    ) -> StoreResult<Vec<ActionResult>>
    where
        T: CareActions + ?Sized,
    {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let result = self.dispatch(store, patient, call).await?;
            telemetry::record_action_dispatched(&call.name, result.success);
            debug!(
                action = %call.name,
                success = result.success,
                detail = %result.message,
                "Action dispatched"
            );
            results.push(result);
        }
        Ok(results)
    }

    pub async fn dispatch<T>(
        &self,
        store: &mut T,
        patient: &PatientProfile,
        call: &ActionCall,
    ) -> StoreResult<ActionResult>
    where
        T: CareActions + ?Sized,
    {
        match AssistantAction::from(call) {
            AssistantAction::RequestAppointment(params) => {
                self.request_appointment(store, patient, params).await
            }
            AssistantAction::CreateTriage(params) => self.create_triage(store, patient, params).await,
            AssistantAction::Unknown { name } => Ok(ActionResult::failed(
                name,
                format!("Unknown action: {}", name),
                ActionFailure::UnknownAction,
            )),
        }
    }

    async fn request_appointment<T>(
        &self,
        store: &mut T,
        patient: &PatientProfile,
        params: &Map<String, Value>,
    ) -> StoreResult<ActionResult>
    where
        T: CareActions + ?Sized,
    {
        let Some(reason) = text_param(params, "reason") else {
            return Ok(missing(REQUEST_APPOINTMENT, "reason", "Reason is required for an appointment request"));
        };
        let urgency = text_param(params, "urgency")
            .and_then(|u| u.parse().ok())
            .unwrap_or(AppointmentUrgency::Normal);
        let department = text_param(params, "department").unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        let Some(link) = store.first_hospital_link(patient.patient_id).await? else {
            return Ok(ActionResult::failed(
                REQUEST_APPOINTMENT,
                "Patient must be linked to a hospital to request appointments",
                ActionFailure::NoLinkedHospital,
            ));
        };

        let request = AppointmentRequest {
            id: Uuid::new_v4(),
            patient_id: patient.patient_id,
            patient_hospital_id: link.id,
            hospital_id: link.hospital_id,
            reason,
            urgency,
            department,
            appointment_type: AppointmentType::InPerson,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        store.create_appointment_request(&request).await?;

        info!(
            patient_id = %patient.patient_id,
            request_id = %request.id,
            urgency = %urgency,
            "Appointment request created from chat"
        );

        Ok(ActionResult::succeeded(
            REQUEST_APPOINTMENT,
            format!(
                "Appointment request submitted (urgency: {}, department: {})",
                urgency, request.department
            ),
            request.id,
        ))
    }

    async fn create_triage<T>(
        &self,
        store: &mut T,
        patient: &PatientProfile,
        params: &Map<String, Value>,
    ) -> StoreResult<ActionResult>
    where
        T: CareActions + ?Sized,
    {
        let Some(symptoms) = text_param(params, "symptoms") else {
            return Ok(missing(CREATE_TRIAGE, "symptoms", "Symptoms description is required"));
        };
        let urgency_level = text_param(params, "urgency_level")
            .and_then(|u| u.parse().ok())
            .unwrap_or(TriageUrgency::Medium);
        let notes = text_param(params, "notes");
        let now = Utc::now();

        // One active ad-hoc case per patient: merge into it when present
        if let Some(mut case) = store.active_adhoc_triage(patient.patient_id).await? {
            case.symptoms = symptoms;
            case.urgency_level = urgency_level;
            case.notes = notes;
            case.updated_at = now;
            store.save_triage_case(&case).await?;

            info!(patient_id = %patient.patient_id, triage_id = %case.id, "Ad-hoc triage case updated");

            return Ok(ActionResult::succeeded(
                CREATE_TRIAGE,
                format!("Triage case updated with new symptoms (urgency: {})", urgency_level),
                case.id,
            ));
        }

        let case = TriageCase {
            id: Uuid::new_v4(),
            patient_id: patient.patient_id,
            symptoms,
            urgency_level,
            notes,
            source: TriageSource::AdHoc,
            active: true,
            language: patient.language(),
            created_at: now,
            updated_at: now,
        };
        store.save_triage_case(&case).await?;

        info!(patient_id = %patient.patient_id, triage_id = %case.id, "Ad-hoc triage case created");

        Ok(ActionResult::succeeded(
            CREATE_TRIAGE,
            format!("Triage case created (urgency: {})", urgency_level),
            case.id,
        ))
    }
}

fn text_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn missing(action: &str, parameter: &str, message: &str) -> ActionResult {
    ActionResult::failed(
        action,
        message,
        ActionFailure::MissingParameter {
            parameter: parameter.to_string(),
        },
    )
}
