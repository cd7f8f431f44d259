// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens em memória. O padrão é "pt" (idioma do time);
// "es" cobre os clientes do Equador e "en" fica de fallback técnico.
pub const DEFAULT_LANG: &str = "pt";

#[derive(Clone)]
pub struct I18nStore {
    // (idioma, chave) -> template. Templates usam placeholders tipo {available}.
    messages: HashMap<(&'static str, &'static str), &'static str>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut m: HashMap<(&'static str, &'static str), &'static str> = HashMap::new();

        let mut add = |key: &'static str, pt: &'static str, es: &'static str, en: &'static str| {
            m.insert(("pt", key), pt);
            m.insert(("es", key), es);
            m.insert(("en", key), en);
        };

        add(
            "error.validation",
            "Um ou mais campos são inválidos.",
            "Uno o más campos son inválidos.",
            "One or more fields are invalid.",
        );
        add(
            "error.invalid_credentials",
            "E-mail ou senha inválidos.",
            "Correo o contraseña inválidos.",
            "Invalid e-mail or password.",
        );
        add(
            "error.invalid_token",
            "Token de autenticação inválido ou ausente.",
            "Token de autenticación inválido o ausente.",
            "Invalid or missing authentication token.",
        );
        add(
            "error.email_exists",
            "Este e-mail já está em uso.",
            "Este correo ya está en uso.",
            "This e-mail is already in use.",
        );
        add(
            "error.user_not_found",
            "Usuário não encontrado.",
            "Usuario no encontrado.",
            "User not found.",
        );
        add(
            "error.not_member",
            "O usuário não pertence a esta empresa.",
            "El usuario no pertenece a esta empresa.",
            "The user does not belong to this company.",
        );
        add(
            "error.forbidden",
            "Você não tem permissão para realizar esta ação.",
            "No tiene permiso para realizar esta acción.",
            "You do not have permission to perform this action.",
        );
        add(
            "error.invalid_quantity",
            "A quantidade deve ser um inteiro positivo.",
            "La cantidad debe ser un entero positivo.",
            "Quantity must be a positive integer.",
        );
        add(
            "error.insufficient_stock",
            "Estoque insuficiente na sucursal: disponível {available}, solicitado {requested}.",
            "Stock insuficiente en la sucursal: disponible {available}, solicitado {requested}.",
            "Insufficient stock at branch: available {available}, requested {requested}.",
        );
        add(
            "error.same_branch",
            "A sucursal de destino não pode ser a mesma de origem.",
            "La sucursal de destino no puede ser la misma de origen.",
            "Destination branch cannot be the same as the origin.",
        );
        add(
            "error.already_confirmed",
            "Este traslado já foi confirmado.",
            "Este traslado ya fue confirmado.",
            "This transfer has already been confirmed.",
        );
        add(
            "error.received_exceeds",
            "A quantidade recebida ({received}) não pode ser maior que a enviada ({delivered}).",
            "La cantidad recibida ({received}) no puede ser mayor que la enviada ({delivered}).",
            "Received quantity ({received}) cannot exceed delivered quantity ({delivered}).",
        );
        add(
            "error.not_found",
            "Recurso não encontrado: {resource}.",
            "Recurso no encontrado: {resource}.",
            "Resource not found: {resource}.",
        );
        add(
            "error.duplicate_code",
            "Já existe um registro com o código {code}.",
            "Ya existe un registro con el código {code}.",
            "A record with code {code} already exists.",
        );
        add(
            "error.invalid_reference",
            "Referência inválida: {resource}.",
            "Referencia inválida: {resource}.",
            "Invalid reference: {resource}.",
        );
        add(
            "error.tax_registry",
            "Falha ao consultar o registro tributário.",
            "Falla al consultar el registro tributario.",
            "Failed to query the tax registry.",
        );
        add(
            "error.internal",
            "Ocorreu um erro inesperado.",
            "Ocurrió un error inesperado.",
            "An unexpected error occurred.",
        );

        Self { messages: m }
    }

    /// Resolve a chave no idioma pedido, caindo para o idioma padrão.
    pub fn translate(&self, lang: &str, key: &'static str) -> &'static str {
        self.messages
            .get(&(Self::normalize(lang), key))
            .or_else(|| self.messages.get(&(DEFAULT_LANG, key)))
            .copied()
            .unwrap_or(key)
    }

    fn normalize(lang: &str) -> &'static str {
        match lang {
            "pt" => "pt",
            "es" => "es",
            "en" => "en",
            _ => DEFAULT_LANG,
        }
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
