use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod validation;

pub use date::Timestamp;
pub use validation::ValidationError;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// 持久化 Bearer 凭据所用的存储键
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const MIN_PASSWORD_LEN: usize = 4;
pub const MIN_SEARCH_LEN: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

pub const DEFAULT_ENERGIA_OPTIONS: &[&str] = &[
    "Controladora",
    "QDCA",
    "QM",
    "Retificador",
    "Disjuntor",
    "Bateria",
    "Iluminação Pátio",
    "Sensor de Porta",
    "Sensor de Incêndio",
    "Iluminação Gabinete/Container",
    "Cabo de Alimentação",
];

pub const DEFAULT_ARCON_OPTIONS: &[&str] = &[
    "Trocador de Calor",
    "Sanrio",
    "Walmont",
    "Limpeza",
    "Contatora",
    "Compressor",
    "Gás",
    "Fusível",
    "Placa Queimada",
    "Transformador",
    "Relé Térmico",
    "Relé Falta de Fase",
    "Comando",
    "Alarme",
];

// =========================================================
// 用户 (Users)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// 账号审批状态
///
/// 旧数据没有该字段，按已批准处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Pending => "Pendente",
            UserStatus::Approved => "Aprovado",
            UserStatus::Rejected => "Rejeitado",
        }
    }
}

/// 当前登录用户（`/me` 的返回）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 用户名首字母（头像占位）
    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// `/login` 与 `/register` 的返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    /// 拆分为 (凭据, 用户)
    pub fn into_parts(self) -> (String, User) {
        let user = User {
            id: self.user_id,
            username: self.username,
            role: self.role,
            status: self.status.unwrap_or_default(),
        };
        (self.access_token, user)
    }
}

/// 待审批用户列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUser {
    pub id: String,
    pub username: String,
    pub created_at: Option<Timestamp>,
}

/// 管理面板中的用户列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_at: Option<Timestamp>,
}

/// 管理员对用户或已完成待办的审批决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

// =========================================================
// 待办事项 (Pendências)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tipo {
    Energia,
    Arcon,
}

impl Tipo {
    pub const ALL: [Tipo; 2] = [Tipo::Energia, Tipo::Arcon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tipo::Energia => "Energia",
            Tipo::Arcon => "Arcon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PendenciaStatus {
    #[default]
    Pendente,
    Finalizado,
    Validado,
    Rejeitado,
}

impl PendenciaStatus {
    pub const ALL: [PendenciaStatus; 4] = [
        PendenciaStatus::Pendente,
        PendenciaStatus::Finalizado,
        PendenciaStatus::Validado,
        PendenciaStatus::Rejeitado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PendenciaStatus::Pendente => "Pendente",
            PendenciaStatus::Finalizado => "Finalizado",
            PendenciaStatus::Validado => "Validado",
            PendenciaStatus::Rejeitado => "Rejeitado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendencia {
    pub id: String,
    pub site: String,
    #[serde(default)]
    pub ami: Option<String>,
    pub data_hora: Timestamp,
    pub tipo: Tipo,
    pub subtipo: String,
    pub observacoes: String,
    #[serde(default)]
    pub foto_base64: Option<String>,
    #[serde(default)]
    pub status: PendenciaStatus,
    pub usuario_criacao: String,
    #[serde(default)]
    pub usuario_finalizacao: Option<String>,
    #[serde(default)]
    pub data_finalizacao: Option<Timestamp>,
    #[serde(default)]
    pub informacoes_fechamento: Option<String>,
    #[serde(default)]
    pub foto_fechamento_base64: Option<String>,
    #[serde(default)]
    pub validation_status: Option<ApprovalDecision>,
    #[serde(default)]
    pub validated_by: Option<String>,
    #[serde(default)]
    pub validated_at: Option<Timestamp>,
    #[serde(default)]
    pub validation_notes: Option<String>,
    pub created_at: Timestamp,
}

impl Pendencia {
    /// 只有仍处于 Pendente 的条目允许普通用户编辑或删除
    pub fn is_editable(&self) -> bool {
        self.status == PendenciaStatus::Pendente
    }

    pub fn can_finalize(&self) -> bool {
        self.status == PendenciaStatus::Pendente
    }

    /// 已完成且尚未审核的条目可由管理员审核
    pub fn awaiting_validation(&self) -> bool {
        self.status == PendenciaStatus::Finalizado && self.validation_status.is_none()
    }

    /// 本地关键字过滤（站点、子类型、备注、AMI）
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(self.site.as_str()),
            Some(self.subtipo.as_str()),
            Some(self.observacoes.as_str()),
            self.ami.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// 创建表单的子类型目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    pub energia_options: Vec<String>,
    pub arcon_options: Vec<String>,
}

impl FormConfig {
    pub fn options_for(&self, tipo: Tipo) -> &[String] {
        match tipo {
            Tipo::Energia => &self.energia_options,
            Tipo::Arcon => &self.arcon_options,
        }
    }

    /// 添加选项，去除首尾空白；空值或重复值返回 false
    pub fn add_option(&mut self, tipo: Tipo, option: &str) -> bool {
        let option = option.trim();
        let list = match tipo {
            Tipo::Energia => &mut self.energia_options,
            Tipo::Arcon => &mut self.arcon_options,
        };
        if option.is_empty() || list.iter().any(|o| o == option) {
            return false;
        }
        list.push(option.to_string());
        true
    }

    pub fn remove_option(&mut self, tipo: Tipo, option: &str) {
        let list = match tipo {
            Tipo::Energia => &mut self.energia_options,
            Tipo::Arcon => &mut self.arcon_options,
        };
        list.retain(|o| o != option);
    }
}

impl Default for FormConfig {
    /// 与服务端默认配置一致，在配置接口不可用时使用
    fn default() -> Self {
        Self {
            energia_options: DEFAULT_ENERGIA_OPTIONS.iter().map(|s| s.to_string()).collect(),
            arcon_options: DEFAULT_ARCON_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitesResponse {
    pub sites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =========================================================
// KML 站点 (Locations)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmlLocation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl KmlLocation {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Sem nome")
    }

    /// Google Maps 链接（坐标齐全时）
    pub fn maps_url(&self) -> Option<String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("https://www.google.com/maps?q={lat},{lon}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmlUploadResponse {
    pub message: String,
    pub kml_id: String,
    pub total_locations: u64,
    #[serde(default)]
    pub locations: Vec<KmlLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmlSearchResponse {
    pub query: String,
    pub total_found: u64,
    pub locations: Vec<KmlLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationObservation {
    pub id: String,
    pub location_id: String,
    pub user_id: String,
    pub username: String,
    pub observation: String,
    pub created_at: Option<Timestamp>,
}

impl LocationObservation {
    /// 作者本人或管理员可以删除
    pub fn deletable_by(&self, user: &User) -> bool {
        user.is_admin() || user.id == self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationCreated {
    pub message: String,
    pub observation_id: String,
}

// =========================================================
// 报表 (Reports)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub period: String,
    pub year: i32,
    pub month: u32,
    pub total: u64,
    pub pending: u64,
    pub finished: u64,
    pub approved: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub tipo: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCount {
    pub site: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Distribution {
    pub by_type: Vec<TypeCount>,
    pub by_site: Vec<SiteCount>,
    pub by_status: Vec<StatusCount>,
}

impl Distribution {
    pub fn total(&self) -> u64 {
        self.by_status.iter().map(|s| s.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorRank {
    pub username: Option<String>,
    pub created: u64,
    pub approved: u64,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizerRank {
    pub username: Option<String>,
    pub finished: u64,
    pub approved: u64,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Performance {
    pub top_creators: Vec<CreatorRank>,
    pub top_finalizers: Vec<FinalizerRank>,
    #[serde(default)]
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub month: String,
    pub year: i32,
    pub created_count: u64,
    pub finished_count: u64,
    pub approved_created_count: u64,
    pub approved_finished_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyLeader {
    #[serde(rename = "_id")]
    pub username: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: String,
    pub year: i32,
    pub most_created: Option<MonthlyLeader>,
    pub most_finished: Option<MonthlyLeader>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_pendencia(status: &str, validation: Option<&str>) -> Pendencia {
        serde_json::from_value(json!({
            "id": "p1",
            "site": "CN19-ABC",
            "data_hora": "2024-05-01T10:00:00",
            "tipo": "Energia",
            "subtipo": "Bateria",
            "observacoes": "Bateria estufada",
            "status": status,
            "usuario_criacao": "alice",
            "validation_status": validation,
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn legacy_user_defaults_to_approved_user_role() {
        let user: User = serde_json::from_value(json!({"id": "1", "username": "velho"})).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, UserStatus::Approved);
    }

    #[test]
    fn me_payload_ignores_server_only_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "username": "admin",
            "hashed_password": "xxx",
            "role": "ADMIN",
            "status": "APPROVED",
            "created_at": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.initial(), "A");
    }

    #[test]
    fn token_response_without_status_is_approved() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "t",
            "user_id": "u1",
            "username": "alice",
            "role": "USER"
        }))
        .unwrap();
        let (credential, user) = token.into_parts();
        assert_eq!(credential, "t");
        assert_eq!(user.status, UserStatus::Approved);
    }

    #[test]
    fn pendencia_lifecycle_predicates() {
        let open = sample_pendencia("Pendente", None);
        assert!(open.is_editable());
        assert!(open.can_finalize());
        assert!(!open.awaiting_validation());

        let done = sample_pendencia("Finalizado", None);
        assert!(!done.is_editable());
        assert!(done.awaiting_validation());

        let validated = sample_pendencia("Finalizado", Some("APPROVED"));
        assert!(!validated.awaiting_validation());
    }

    #[test]
    fn pendencia_local_search() {
        let p = sample_pendencia("Pendente", None);
        assert!(p.matches("estufada"));
        assert!(p.matches("cn19"));
        assert!(p.matches("  "));
        assert!(!p.matches("compressor"));
    }

    #[test]
    fn form_config_rejects_blank_and_duplicate_options() {
        let mut config = FormConfig::default();
        assert!(config.options_for(Tipo::Energia).contains(&"QDCA".to_string()));
        assert!(!config.add_option(Tipo::Arcon, "Gás"));
        assert!(!config.add_option(Tipo::Arcon, "   "));
        assert!(config.add_option(Tipo::Arcon, " Dreno "));
        assert_eq!(config.arcon_options.last().map(String::as_str), Some("Dreno"));
        config.remove_option(Tipo::Arcon, "Dreno");
        assert_eq!(config.arcon_options.len(), DEFAULT_ARCON_OPTIONS.len());
    }

    #[test]
    fn monthly_leader_reads_aggregation_id() {
        let stats: MonthlyStats = serde_json::from_value(json!({
            "month": "May",
            "year": 2024,
            "most_created": {"_id": "alice", "count": 7},
            "most_finished": null
        }))
        .unwrap();
        assert_eq!(stats.most_created.unwrap().username.as_deref(), Some("alice"));
        assert!(stats.most_finished.is_none());
    }

    #[test]
    fn observation_deletable_by_author_or_admin() {
        let obs = LocationObservation {
            id: "o1".into(),
            location_id: "l1".into(),
            user_id: "u1".into(),
            username: "alice".into(),
            observation: "Portão trancado".into(),
            created_at: None,
        };
        let person = |id: &str, role: Role| User {
            id: id.into(),
            username: id.into(),
            role,
            status: UserStatus::Approved,
        };
        assert!(obs.deletable_by(&person("u1", Role::User)));
        assert!(!obs.deletable_by(&person("u2", Role::User)));
        assert!(obs.deletable_by(&person("u2", Role::Admin)));
    }
}
