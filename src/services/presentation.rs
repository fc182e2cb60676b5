// src/services/presentation.rs
//
// Campos derivados exibidos na tabela e na gaveta de detalhes.

use chrono::{DateTime, Utc};

use crate::{
    models::{
        company::Company,
        view::{CompanyDetails, CompanyRow, Language},
    },
    services::{
        document::display_tax_document,
        trial::{days_since_last_activity_at, remaining_trial_days_at},
    },
};

/// Dias restantes para exibição.
///
/// Se a API já mandou `remaining_days`, vale o do servidor. Senão calculamos
/// a partir do início do teste, e só enquanto o teste está ativo.
/// Sem limite configurado (`limit_days == None`) não há como calcular.
pub fn remaining_days_for(company: &Company, limit_days: Option<u32>, now: DateTime<Utc>) -> Option<u32> {
    if let Some(server_days) = company.remaining_days {
        return Some(u32::try_from(server_days.max(0)).unwrap_or(u32::MAX));
    }
    if !company.test_period_active {
        return None;
    }
    remaining_trial_days_at(company.start_test_period_at, limit_days?, now)
}

/// `None` quando não há atividade registrada ("N/A" na tela).
pub fn inactive_days_for(company: &Company, now: DateTime<Utc>) -> Option<u64> {
    company
        .last_activity_at
        .map(|at| days_since_last_activity_at(Some(at), now))
}

pub fn company_row(
    company: &Company,
    limit_days: Option<u32>,
    now: DateTime<Utc>,
    lang: Language,
) -> CompanyRow {
    let remaining_days = remaining_days_for(company, limit_days, now);

    CompanyRow {
        id: company.id,
        name: company.name.clone(),
        document: display_tax_document(&company.document),
        access_allowed: company.access_allowed,
        status_label: lang.access_label(company.access_allowed).to_string(),
        test_period_active: company.test_period_active,
        test_period_label: lang.yes_no(company.test_period_active).to_string(),
        remaining_days,
        remaining_days_label: remaining_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| lang.not_available().to_string()),
        inactive_days: inactive_days_for(company, now),
        address: company.address.clone(),
        neighborhood: company.neighborhood.clone(),
        city: company.city.clone(),
        state: company.state.clone(),
        phone: company.phone.clone(),
        id_user: company.id_user,
    }
}

pub fn company_details(company: &Company, limit_days: Option<u32>, now: DateTime<Utc>) -> CompanyDetails {
    CompanyDetails {
        id: company.id,
        id_machine: company.id_machine.clone(),
        name: company.name.clone(),
        document: display_tax_document(&company.document),
        state: company.state.clone(),
        city: company.city.clone(),
        address: company.address.clone(),
        complement: company.complement.clone(),
        phone: company.phone.clone(),
        neighborhood: company.neighborhood.clone(),
        inactive_days: inactive_days_for(company, now),
        access_allowed: company.access_allowed,
        test_period_active: company.test_period_active,
        remaining_days: remaining_days_for(company, limit_days, now),
        start_test_period_at: company.start_test_period_at,
        last_activity_at: company.last_activity_at,
        created_at: company.created_at,
        id_user: company.id_user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn company() -> Company {
        Company {
            id: 1,
            id_machine: Some("MAQ-01".into()),
            document: "12345678000190".into(),
            access_allowed: false,
            test_period_active: true,
            name: "Mercearia Boa Vista".into(),
            address: None,
            complement: None,
            neighborhood: None,
            city: Some("Curitiba".into()),
            state: Some("PR".into()),
            phone: None,
            start_test_period_at: Some(now() - Duration::days(4)),
            last_activity_at: Some(now() - Duration::hours(30)),
            remaining_days: None,
            created_at: now() - Duration::days(5),
            id_user: Some(3),
        }
    }

    #[test]
    fn computes_remaining_days_when_server_does_not() {
        assert_eq!(remaining_days_for(&company(), Some(15), now()), Some(11));
        // sem limite configurado: N/A
        assert_eq!(remaining_days_for(&company(), None, now()), None);
    }

    #[test]
    fn server_value_wins_and_is_never_negative() {
        let mut c = company();
        c.remaining_days = Some(9);
        assert_eq!(remaining_days_for(&c, Some(15), now()), Some(9));
        c.remaining_days = Some(-2);
        assert_eq!(remaining_days_for(&c, None, now()), Some(0));
    }

    #[test]
    fn inactive_trial_shows_nothing() {
        let mut c = company();
        c.test_period_active = false;
        assert_eq!(remaining_days_for(&c, Some(15), now()), None);
    }

    #[test]
    fn row_is_localized() {
        let row = company_row(&company(), Some(15), now(), Language::Pt);
        assert_eq!(row.document, "12.345.678/0001-90");
        assert_eq!(row.status_label, "Inativo");
        assert_eq!(row.test_period_label, "Sim");
        assert_eq!(row.remaining_days_label, "11");
        assert_eq!(row.inactive_days, Some(2));

        let row = company_row(&company(), None, now(), Language::En);
        assert_eq!(row.status_label, "Inactive");
        assert_eq!(row.test_period_label, "Yes");
        assert_eq!(row.remaining_days_label, "N/A");
    }

    #[test]
    fn details_without_activity_have_no_inactive_days() {
        let mut c = company();
        c.last_activity_at = None;
        let details = company_details(&c, Some(15), now());
        assert_eq!(details.inactive_days, None);
        assert_eq!(details.id_machine.as_deref(), Some("MAQ-01"));
    }
}
