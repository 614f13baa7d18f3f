use crate::{
    ApprovalDecision, Distribution, FormConfig, KmlLocation, KmlSearchResponse, KmlUploadResponse,
    LocationObservation, MessageResponse, MonthlyStats, ObservationCreated, Pendencia,
    PendenciaStatus, PendingUser, Performance, SitesResponse, TimelinePoint, Tipo, TokenResponse,
    User, UserStats, UserSummary,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A single file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    File(FilePart),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the API base (e.g. `/pendencias`). Path parameters are
/// carried as `#[serde(skip)]` fields so they never leak into the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer credential is attached. Only login/register opt out.
    const AUTHENTICATED: bool = true;

    /// The URL path (or suffix).
    fn path(&self) -> String;

    /// Query string pairs. Empty values are skipped by the transport.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Encode the body. GET and DELETE carry none by default.
    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        match Self::METHOD {
            HttpMethod::Get | HttpMethod::Delete => Ok(RequestBody::Empty),
            HttpMethod::Post | HttpMethod::Put => {
                serde_json::to_string(self).map(RequestBody::Json)
            }
        }
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/register".to_string()
    }
}

/// Fetch the identity bound to the current credential.
#[derive(Debug, Clone, Serialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/me".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/user/change-password".to_string()
    }
}

// =========================================================
// Pendências
// =========================================================

/// List pendências, optionally filtered server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPendenciasRequest {
    #[serde(skip)]
    pub site: Option<String>,
    #[serde(skip)]
    pub tipo: Option<Tipo>,
    #[serde(skip)]
    pub status: Option<PendenciaStatus>,
}

impl ApiRequest for ListPendenciasRequest {
    type Response = Vec<Pendencia>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/pendencias".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(site) = &self.site {
            query.push(("site", site.clone()));
        }
        if let Some(tipo) = self.tipo {
            query.push(("tipo", tipo.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePendenciaRequest {
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ami: Option<String>,
    pub tipo: Tipo,
    pub subtipo: String,
    pub observacoes: String,
    pub foto_base64: String,
}

impl ApiRequest for CreatePendenciaRequest {
    type Response = Pendencia;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/pendencias".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SitesRequest;

impl ApiRequest for SitesRequest {
    type Response = SitesResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/sites".to_string()
    }
}

/// Move a pendência to `Finalizado`. Closing notes and photo are mandatory.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizePendenciaRequest {
    #[serde(skip)]
    pub id: String,
    pub status: PendenciaStatus,
    pub informacoes_fechamento: String,
    pub foto_fechamento_base64: String,
}

impl FinalizePendenciaRequest {
    pub fn new(id: impl Into<String>, notes: impl Into<String>, photo: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: PendenciaStatus::Finalizado,
            informacoes_fechamento: notes.into(),
            foto_fechamento_base64: photo.into(),
        }
    }
}

impl ApiRequest for FinalizePendenciaRequest {
    type Response = Pendencia;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/pendencias/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditPendenciaRequest {
    #[serde(skip)]
    pub id: String,
    pub site: String,
    pub ami: Option<String>,
    pub tipo: Tipo,
    pub subtipo: String,
    pub observacoes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto_base64: Option<String>,
}

impl EditPendenciaRequest {
    /// Prefill from an existing pendência, keeping its photo.
    pub fn from_pendencia(p: &Pendencia) -> Self {
        Self {
            id: p.id.clone(),
            site: p.site.clone(),
            ami: p.ami.clone(),
            tipo: p.tipo,
            subtipo: p.subtipo.clone(),
            observacoes: p.observacoes.clone(),
            foto_base64: p.foto_base64.clone(),
        }
    }
}

impl ApiRequest for EditPendenciaRequest {
    type Response = Pendencia;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/pendencias/{}/edit", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePendenciaRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeletePendenciaRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/pendencias/{}", self.id)
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct PendingUsersRequest;

impl ApiRequest for PendingUsersRequest {
    type Response = Vec<PendingUser>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/pending-users".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AllUsersRequest;

impl ApiRequest for AllUsersRequest {
    type Response = Vec<UserSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/all-users".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveUserRequest {
    #[serde(skip)]
    pub user_id: String,
    pub status: ApprovalDecision,
}

impl ApiRequest for ApproveUserRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/approve-user/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteUserRequest {
    #[serde(skip)]
    pub user_id: String,
}

impl ApiRequest for DeleteUserRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/delete-user/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    #[serde(skip)]
    pub user_id: String,
    pub new_password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/reset-password/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminPendenciasRequest;

impl ApiRequest for AdminPendenciasRequest {
    type Response = Vec<Pendencia>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/pendencias".to_string()
    }
}

/// Approve or reject a finalized pendência. A rejection sends it back to `Pendente`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatePendenciaRequest {
    #[serde(skip)]
    pub id: String,
    pub status: ApprovalDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_notes: Option<String>,
}

impl ApiRequest for ValidatePendenciaRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/validate-pendencia/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDeletePendenciaRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for AdminDeletePendenciaRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/delete-pendencia/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetFormConfigRequest;

impl ApiRequest for GetFormConfigRequest {
    type Response = FormConfig;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/form-config".to_string()
    }
}

/// Saving the catalogue re-uses `FormConfig` as the request body.
impl ApiRequest for FormConfig {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/admin/form-config".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadKmlRequest {
    #[serde(skip)]
    pub filename: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ApiRequest for UploadKmlRequest {
    type Response = KmlUploadResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/admin/upload-kml".to_string()
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::File(FilePart {
            field: "file".to_string(),
            filename: self.filename.clone(),
            content_type: "application/vnd.google-earth.kml+xml".to_string(),
            bytes: self.bytes.clone(),
        }))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteKmlRequest {
    #[serde(skip)]
    pub kml_id: String,
}

impl ApiRequest for DeleteKmlRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/kml/{}", self.kml_id)
    }
}

// =========================================================
// KML locations
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct KmlLocationsRequest;

impl ApiRequest for KmlLocationsRequest {
    type Response = Vec<KmlLocation>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/kml/locations".to_string()
    }
}

/// Build with [`KmlSearchRequest::new`] to enforce the minimum query length.
#[derive(Debug, Clone, Serialize)]
pub struct KmlSearchRequest {
    #[serde(skip)]
    pub query: String,
    #[serde(skip)]
    pub limit: u32,
}

impl ApiRequest for KmlSearchRequest {
    type Response = KmlSearchResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/kml/search".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("query", self.query.clone()), ("limit", self.limit.to_string())]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddObservationRequest {
    #[serde(skip)]
    pub location_id: String,
    pub observation: String,
}

impl ApiRequest for AddObservationRequest {
    type Response = ObservationCreated;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/kml/locations/{}/observations", self.location_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListObservationsRequest {
    #[serde(skip)]
    pub location_id: String,
}

impl ApiRequest for ListObservationsRequest {
    type Response = Vec<LocationObservation>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/kml/locations/{}/observations", self.location_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteObservationRequest {
    #[serde(skip)]
    pub observation_id: String,
}

impl ApiRequest for DeleteObservationRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/kml/observations/{}", self.observation_id)
    }
}

// =========================================================
// Reports & stats
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserStatsRequest;

impl ApiRequest for UserStatsRequest {
    type Response = UserStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/user/stats".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStatsRequest;

impl ApiRequest for MonthlyStatsRequest {
    type Response = MonthlyStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/stats/monthly".to_string()
    }
}

/// Monthly series; the server defaults to the last 180 days.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimelineReportRequest {
    #[serde(skip)]
    pub start_date: Option<String>,
    #[serde(skip)]
    pub end_date: Option<String>,
}

impl ApiRequest for TimelineReportRequest {
    type Response = Vec<TimelinePoint>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/timeline".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(start) = &self.start_date {
            query.push(("start_date", start.clone()));
        }
        if let Some(end) = &self.end_date {
            query.push(("end_date", end.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReportRequest;

impl ApiRequest for DistributionReportRequest {
    type Response = Distribution;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/distribution".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReportRequest;

impl ApiRequest for PerformanceReportRequest {
    type Response = Performance;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/performance".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn json_body<R: ApiRequest>(req: &R) -> Value {
        match req.body().unwrap() {
            RequestBody::Json(s) => serde_json::from_str(&s).unwrap(),
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn path_params_stay_out_of_the_body() {
        let req = ApproveUserRequest {
            user_id: "u-42".into(),
            status: ApprovalDecision::Rejected,
        };
        assert_eq!(req.path(), "/admin/approve-user/u-42");
        assert_eq!(json_body(&req), json!({"status": "REJECTED"}));
    }

    #[test]
    fn finalize_sets_finalizado_status() {
        let req =
            FinalizePendenciaRequest::new("p1", "Trocada a bateria", "data:image/png;base64,AA");
        assert_eq!(req.path(), "/pendencias/p1");
        assert_eq!(
            json_body(&req),
            json!({
                "status": "Finalizado",
                "informacoes_fechamento": "Trocada a bateria",
                "foto_fechamento_base64": "data:image/png;base64,AA"
            })
        );
    }

    #[test]
    fn get_and_delete_have_no_body() {
        assert_eq!(MeRequest.body().unwrap(), RequestBody::Empty);
        let del = DeleteUserRequest { user_id: "x".into() };
        assert_eq!(del.body().unwrap(), RequestBody::Empty);
    }

    #[test]
    fn list_filters_become_query_pairs() {
        let req = ListPendenciasRequest {
            site: Some("CN19-01".into()),
            tipo: Some(Tipo::Arcon),
            status: None,
        };
        assert_eq!(
            req.query(),
            vec![("site", "CN19-01".to_string()), ("tipo", "Arcon".to_string())]
        );
    }

    #[test]
    fn only_login_and_register_skip_credentials() {
        assert!(!LoginRequest::AUTHENTICATED);
        assert!(!RegisterRequest::AUTHENTICATED);
        assert!(MeRequest::AUTHENTICATED);
        assert!(FormConfig::AUTHENTICATED);
    }

    #[test]
    fn kml_upload_is_multipart_file() {
        let req = UploadKmlRequest {
            filename: "sites.kml".into(),
            bytes: b"<kml/>".to_vec(),
        };
        match req.body().unwrap() {
            RequestBody::File(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.filename, "sites.kml");
                assert_eq!(part.bytes, b"<kml/>");
            }
            other => panic!("expected file body, got {other:?}"),
        }
    }
}
