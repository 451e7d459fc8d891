//! User-facing message strings.
//!
//! These strings are part of the HTTP contract; clients match on them.

pub const SIMULATIONS_FOUND: &str = "Simulações encontradas";
pub const SIMULATION_FOUND: &str = "Simulação encontrada";
pub const SIMULATION_NOT_FOUND: &str = "Simulação não encontrada";
pub const SIMULATION_CREATED: &str = "Simulação criada com sucesso";
pub const SIMULATION_REMOVED: &str = "Simulação removida com sucesso";
pub const CPF_ALREADY_EXISTS: &str = "CPF já existente";

pub const NAME_EMPTY: &str = "Nome não pode ser vazio";
pub const CPF_EMPTY: &str = "CPF não pode ser vazio";
pub const CPF_INVALID: &str = "CPF inválido";
pub const CPF_IMMUTABLE: &str = "CPF não pode ser alterado";

pub const INVALID_BODY: &str = "Corpo da requisição inválido";
pub const STORAGE_UNAVAILABLE: &str = "Armazenamento indisponível";
pub const RESTRICTIONS_UNAVAILABLE: &str = "Serviço de restrições indisponível";

/// Field names used as keys in validation error maps.
pub mod fields {
    pub const NAME: &str = "nome";
    pub const CPF: &str = "cpf";
}

#[must_use]
pub fn cpf_not_found(cpf: &str) -> String {
    format!("CPF {cpf} não encontrado")
}

#[must_use]
pub fn cpf_taken(cpf: &str) -> String {
    format!("CPF {cpf} já existe")
}

#[must_use]
pub fn cpf_restricted(cpf: &str) -> String {
    format!("O CPF {cpf} tem restrição")
}
