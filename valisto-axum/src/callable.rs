use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use valisto_core::ValistoError;
use valisto_sync::{DocumentStore, SyncError};

use crate::{ValistoAxumError, ValistoAxumState};

/// Request body of the callable sync endpoint.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<String>,
}

/// Success payload of the callable sync endpoint.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "productosSincronizados")]
    pub productos_sincronizados: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventario: Option<BTreeMap<String, i64>>,
}

fn map_json_rejection(rejection: JsonRejection) -> ValistoAxumError {
    ValistoError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.to_string()]}))
        .into_anyhow()
        .into()
}

/// Map engine failures onto client-visible structured errors.
fn map_sync_error(err: SyncError) -> ValistoAxumError {
    let mapped = match &err {
        SyncError::MissingTenantId => ValistoError::bad_request("El campo tenantId es obligatorio"),
        SyncError::TenantNotFound(tenant) => {
            ValistoError::not_found(format!("No se encontró el tenant {tenant}"))
        }
        SyncError::UserNotFound(tenant) => {
            ValistoError::not_found(format!("No se encontró un usuario para el tenant {tenant}"))
        }
        SyncError::PlanNotEligible(_) => ValistoError::forbidden(
            "La sincronización de inventario solo está disponible para el plan individual",
        ),
        SyncError::Store(_) => ValistoError::general_error("Error al sincronizar el inventario"),
    };
    mapped.with_source(anyhow::Error::new(err)).into_anyhow().into()
}

/// Mount the callable sync endpoint.
pub fn callable_router<S>(state: ValistoAxumState<S>) -> Router<()>
where
    S: DocumentStore + ?Sized + 'static,
{
    Router::new()
        .route(
            "/syncIndividualInventory",
            routing::post(
                move |State(state): State<ValistoAxumState<S>>,
                      body: Result<Json<SyncRequest>, JsonRejection>| async move {
                    let Json(request) = body.map_err(map_json_rejection)?;

                    let tenant_id = request.tenant_id.unwrap_or_default();
                    let report = state
                        .engine
                        .sync_on_demand(&tenant_id)
                        .await
                        .map_err(map_sync_error)?;

                    let response = if report.productos == 0 {
                        SyncResponse {
                            success: true,
                            message: "No hay productos en el depósito para sincronizar"
                                .to_string(),
                            productos_sincronizados: 0,
                            inventario: None,
                        }
                    } else {
                        SyncResponse {
                            success: true,
                            message: format!(
                                "Inventario sincronizado correctamente ({} productos)",
                                report.productos
                            ),
                            productos_sincronizados: report.productos,
                            inventario: Some(report.inventario),
                        }
                    };
                    Ok::<_, ValistoAxumError>(Json(response))
                },
            ),
        )
        .with_state(state)
}
