//! 客户端校验
//!
//! 与服务端规则保持一致，在发出请求前拦截明显无效的输入。

use crate::protocol::{
    AddObservationRequest, CreatePendenciaRequest, EditPendenciaRequest, FinalizePendenciaRequest,
    KmlSearchRequest,
};
use crate::{MIN_PASSWORD_LEN, MIN_SEARCH_LEN};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("O campo {0} é obrigatório")]
    Required(&'static str),
    #[error("A foto é obrigatória para criar uma pendência")]
    PhotoRequired,
    #[error("As informações de fechamento são obrigatórias")]
    ClosingNotesRequired,
    #[error("A foto de fechamento é obrigatória")]
    ClosingPhotoRequired,
    #[error("A senha deve ter pelo menos {min} caracteres")]
    PasswordTooShort { min: usize },
    #[error("As senhas não coincidem")]
    PasswordMismatch,
    #[error("A busca deve ter pelo menos {min} caracteres")]
    QueryTooShort { min: usize },
    #[error("Observação não pode estar vazia")]
    EmptyObservation,
    #[error("Apenas arquivos KML são aceitos")]
    NotKml,
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// 新密码长度与确认一致性
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// 仅接受 `.kml` 扩展名（不区分大小写）
pub fn validate_kml_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.to_lowercase().ends_with(".kml") {
        Ok(())
    } else {
        Err(ValidationError::NotKml)
    }
}

impl CreatePendenciaRequest {
    /// 去除首尾空白后校验
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.site = self.site.trim().to_string();
        self.observacoes = self.observacoes.trim().to_string();
        self.ami = self
            .ami
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        require(&self.site, "Site")?;
        require(&self.subtipo, "Subtipo")?;
        require(&self.observacoes, "Observações")?;
        if self.foto_base64.trim().is_empty() {
            return Err(ValidationError::PhotoRequired);
        }
        Ok(self)
    }
}

impl EditPendenciaRequest {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.site = self.site.trim().to_string();
        self.observacoes = self.observacoes.trim().to_string();
        self.ami = self
            .ami
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        require(&self.site, "Site")?;
        require(&self.subtipo, "Subtipo")?;
        require(&self.observacoes, "Observações")?;
        Ok(self)
    }
}

impl FinalizePendenciaRequest {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.informacoes_fechamento = self.informacoes_fechamento.trim().to_string();
        if self.informacoes_fechamento.is_empty() {
            return Err(ValidationError::ClosingNotesRequired);
        }
        if self.foto_fechamento_base64.trim().is_empty() {
            return Err(ValidationError::ClosingPhotoRequired);
        }
        Ok(self)
    }
}

impl KmlSearchRequest {
    pub fn new(query: &str, limit: u32) -> Result<Self, ValidationError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Err(ValidationError::QueryTooShort {
                min: MIN_SEARCH_LEN,
            });
        }
        Ok(Self {
            query: query.to_string(),
            limit,
        })
    }
}

impl AddObservationRequest {
    pub fn new(location_id: impl Into<String>, text: &str) -> Result<Self, ValidationError> {
        let observation = text.trim();
        if observation.is_empty() {
            return Err(ValidationError::EmptyObservation);
        }
        Ok(Self {
            location_id: location_id.into(),
            observation: observation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_SEARCH_LIMIT, Tipo};

    fn create_request() -> CreatePendenciaRequest {
        CreatePendenciaRequest {
            site: "  CN19-77 ".into(),
            ami: Some("   ".into()),
            tipo: Tipo::Energia,
            subtipo: "QDCA".into(),
            observacoes: " Disjuntor desarmando ".into(),
            foto_base64: "data:image/jpeg;base64,AAAA".into(),
        }
    }

    #[test]
    fn create_trims_and_drops_blank_ami() {
        let req = create_request().normalized().unwrap();
        assert_eq!(req.site, "CN19-77");
        assert_eq!(req.observacoes, "Disjuntor desarmando");
        assert_eq!(req.ami, None);
    }

    #[test]
    fn create_requires_site_and_photo() {
        let mut req = create_request();
        req.site = "  ".into();
        assert_eq!(req.normalized().unwrap_err(), ValidationError::Required("Site"));

        let mut req = create_request();
        req.foto_base64 = String::new();
        assert_eq!(req.normalized().unwrap_err(), ValidationError::PhotoRequired);
    }

    #[test]
    fn finalize_requires_notes_then_photo() {
        let req = FinalizePendenciaRequest::new("p", "   ", "foto");
        assert_eq!(req.normalized().unwrap_err(), ValidationError::ClosingNotesRequired);

        let req = FinalizePendenciaRequest::new("p", "ok", "");
        assert_eq!(req.normalized().unwrap_err(), ValidationError::ClosingPhotoRequired);
    }

    #[test]
    fn password_rules() {
        assert_eq!(
            validate_new_password("abc", "abc").unwrap_err(),
            ValidationError::PasswordTooShort { min: 4 }
        );
        assert_eq!(
            validate_new_password("abcd", "abce").unwrap_err(),
            ValidationError::PasswordMismatch
        );
        assert!(validate_new_password("pw12", "pw12").is_ok());
    }

    #[test]
    fn search_needs_two_characters() {
        assert!(KmlSearchRequest::new(" a ", DEFAULT_SEARCH_LIMIT).is_err());
        let req = KmlSearchRequest::new(" cn ", DEFAULT_SEARCH_LIMIT).unwrap();
        assert_eq!(req.query, "cn");
    }

    #[test]
    fn kml_extension_is_case_insensitive() {
        assert!(validate_kml_filename("Sites.KML").is_ok());
        assert_eq!(validate_kml_filename("sites.kmz"), Err(ValidationError::NotKml));
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::Required("Site").to_string(),
            "O campo Site é obrigatório"
        );
    }
}
