//! Fixed template catalog.
//!
//! Templates are the studio's marketing copy, defined once at startup and
//! never mutated at runtime. Lookup is exact-match by id; listing preserves
//! declaration order.

use std::collections::HashMap;

use super::substitution::substitute;
use super::types::{RenderedEmail, Template, TemplateError, TemplateResult};

/// Read-only, insertion-ordered template catalog
pub struct TemplateCatalog {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
}

impl TemplateCatalog {
    /// Build a catalog, validating every entry (including the declared
    /// variable list against the scanned placeholders)
    pub fn new(templates: Vec<Template>) -> TemplateResult<Self> {
        let mut index = HashMap::with_capacity(templates.len());

        for (pos, template) in templates.iter().enumerate() {
            template.validate()?;

            if index.insert(template.id.clone(), pos).is_some() {
                return Err(TemplateError::InvalidTemplate {
                    template: template.id.clone(),
                    reason: "duplicate template id".to_string(),
                });
            }
        }

        Ok(Self { templates, index })
    }

    /// The studio's built-in catalog
    pub fn builtin() -> TemplateResult<Self> {
        Self::new(vec![
            Template::new(
                "boas_vindas",
                "Boas-vindas",
                "Bem-vinda ao mundo da fotografia, {nome}!",
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <header style="background: #D4AF37; padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0;">Atelier Fotografia</h1>
  </header>
  <div style="padding: 30px; background: white;">
    <h2 style="color: #333;">Olá, {nome}!</h2>
    <p style="color: #666;">Seja muito bem-vinda! Aqui você receberá dicas exclusivas de fotografia,
    promoções especiais e novidades sobre nossos ensaios.</p>
  </div>
  <footer style="background: #f8f8f8; padding: 20px; text-align: center; color: #999;">
    <p><a href="{unsubscribe_url}" style="color: #999;">Descadastrar</a></p>
  </footer>
</div>"#,
                &["nome", "unsubscribe_url"],
            ),
            Template::new(
                "promocao_ensaio",
                "Promoção de Ensaio",
                "Promoção especial: {desconto}% OFF em ensaios!",
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <header style="background: #D4AF37; padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0;">PROMOÇÃO ESPECIAL</h1>
    <p style="color: white; font-size: 18px;">{desconto}% OFF</p>
  </header>
  <div style="padding: 30px; background: white;">
    <h2 style="color: #333;">Olá, {nome}!</h2>
    <div style="background: #f9f9f9; padding: 20px; border-radius: 10px;">
      <h3 style="color: #D4AF37; margin: 0 0 10px 0;">{tipo_ensaio}</h3>
      <p style="color: #666; margin: 0;">{descricao_promocao}</p>
      <p style="color: #333; font-weight: bold;">De R$ {valor_original} por apenas R$ {valor_promocional}</p>
    </div>
    <p style="color: #999; font-size: 14px; text-align: center;">Promoção válida até {data_limite}</p>
  </div>
  <footer style="background: #f8f8f8; padding: 20px; text-align: center; color: #999;">
    <p><a href="{unsubscribe_url}" style="color: #999;">Descadastrar</a></p>
  </footer>
</div>"#,
                &[
                    "nome",
                    "desconto",
                    "tipo_ensaio",
                    "descricao_promocao",
                    "valor_original",
                    "valor_promocional",
                    "data_limite",
                    "unsubscribe_url",
                ],
            ),
            Template::new(
                "follow_up_ensaio",
                "Follow-up Pós-Ensaio",
                "Como foi seu ensaio, {nome}?",
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <header style="background: #D4AF37; padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0;">Obrigada pela Confiança!</h1>
  </header>
  <div style="padding: 30px; background: white;">
    <h2 style="color: #333;">Oi, {nome}!</h2>
    <p style="color: #666;">Espero que tenha amado seu ensaio de {tipo_ensaio}!
    Suas fotos editadas já estão disponíveis na galeria privada.</p>
    <p style="color: #666;">Gostaria muito de saber sua opinião sobre o ensaio.</p>
  </div>
  <footer style="background: #f8f8f8; padding: 20px; text-align: center; color: #999;">
    <p><a href="{unsubscribe_url}" style="color: #999;">Descadastrar</a></p>
  </footer>
</div>"#,
                &["nome", "tipo_ensaio", "unsubscribe_url"],
            ),
            Template::new(
                "newsletter_mensal",
                "Newsletter Mensal",
                "Newsletter {mes}/{ano} - Novidades e Dicas",
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <header style="background: #D4AF37; padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0;">Newsletter {mes}/{ano}</h1>
  </header>
  <div style="padding: 30px; background: white;">
    <h2 style="color: #333;">Olá, {nome}!</h2>
    <h3 style="color: #D4AF37;">Destaques do Mês</h3>
    <ul style="color: #666;">
      <li>{destaque_1}</li>
      <li>{destaque_2}</li>
      <li>{destaque_3}</li>
    </ul>
    <h3 style="color: #D4AF37;">Dica de Fotografia</h3>
    <p style="color: #666;">{dica_fotografia}</p>
  </div>
  <footer style="background: #f8f8f8; padding: 20px; text-align: center; color: #999;">
    <p><a href="{unsubscribe_url}" style="color: #999;">Descadastrar</a></p>
  </footer>
</div>"#,
                &[
                    "nome",
                    "mes",
                    "ano",
                    "destaque_1",
                    "destaque_2",
                    "destaque_3",
                    "dica_fotografia",
                    "unsubscribe_url",
                ],
            ),
        ])
    }

    /// Get a template by id
    pub fn get(&self, id: &str) -> TemplateResult<&Template> {
        self.index
            .get(id)
            .map(|&pos| &self.templates[pos])
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// All templates in declaration order
    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    /// Template ids in declaration order
    pub fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.id.clone()).collect()
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a template with variables
    ///
    /// Both subject and body are substituted before anything is returned, so
    /// a missing variable never leaks a partially rendered message.
    pub fn render(
        &self,
        id: &str,
        variables: &HashMap<String, String>,
    ) -> TemplateResult<RenderedEmail> {
        let template = self.get(id)?;

        let subject = substitute(&template.id, &template.subject, variables)?;
        let body = substitute(&template.id, &template.body, variables)?;

        Ok(RenderedEmail {
            template_id: template.id.clone(),
            name: template.name.clone(),
            subject,
            body,
        })
    }
}
