// src/services/trial.rs
//
// Contas do período de teste. Funções puras: o "agora" entra como argumento
// nas variantes `_at`; as demais usam o relógio de parede.

use chrono::{DateTime, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Dias (arredondados para cima) entre `from` e `now`.
///
/// Usa a diferença absoluta: uma data no futuro conta como se estivesse no
/// passado à mesma distância. Comportamento herdado, mantido de propósito
/// até o produto decidir o contrário.
pub fn elapsed_days(from: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let diff_ms = (now - from).num_milliseconds().unsigned_abs();
    diff_ms.div_ceil(DAY_MS as u64)
}

/// Dias restantes de teste, limitados a `[0, limit_days]`.
/// `None` quando o teste nunca começou.
pub fn remaining_trial_days_at(
    start: Option<DateTime<Utc>>,
    limit_days: u32,
    now: DateTime<Utc>,
) -> Option<u32> {
    let start = start?;
    let elapsed = elapsed_days(start, now);
    let remaining = i128::from(limit_days) - i128::from(elapsed);

    if remaining < 0 {
        return Some(0);
    }
    Some(remaining as u32)
}

pub fn remaining_trial_days(start: Option<DateTime<Utc>>, limit_days: u32) -> Option<u32> {
    remaining_trial_days_at(start, limit_days, Utc::now())
}

/// Dias desde a última atividade. Sem atividade registrada devolve 0
/// (quem exibe deve tratar o campo ausente como "N/A").
pub fn days_since_last_activity_at(last_activity: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    match last_activity {
        Some(at) => elapsed_days(at, now),
        None => 0,
    }
}

pub fn days_since_last_activity(last_activity: Option<DateTime<Utc>>) -> u64 {
    days_since_last_activity_at(last_activity, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_start_date_means_not_applicable() {
        assert_eq!(remaining_trial_days_at(None, 15, now()), None);
        assert_eq!(remaining_trial_days_at(None, 0, now()), None);
    }

    #[test]
    fn partial_days_round_up() {
        // 1 dia e 1 hora atrás conta como 2 dias consumidos
        let start = now() - Duration::days(1) - Duration::hours(1);
        assert_eq!(remaining_trial_days_at(Some(start), 15, now()), Some(13));

        // um milissegundo já consome um dia inteiro
        let start = now() - Duration::milliseconds(1);
        assert_eq!(remaining_trial_days_at(Some(start), 15, now()), Some(14));
    }

    #[test]
    fn start_exactly_now_keeps_the_whole_limit() {
        assert_eq!(remaining_trial_days_at(Some(now()), 30, now()), Some(30));
    }

    #[test]
    fn expired_trial_clamps_to_zero() {
        let start = now() - Duration::days(90);
        assert_eq!(remaining_trial_days_at(Some(start), 30, now()), Some(0));
        assert_eq!(remaining_trial_days_at(Some(now() - Duration::days(3)), 0, now()), Some(0));
    }

    #[test]
    fn result_always_within_zero_and_limit() {
        for limit in [0_u32, 1, 7, 15, 30, 365] {
            for offset_hours in [-2000_i64, -49, -24, -1, 0, 1, 23, 24, 25, 1000] {
                let start = now() + Duration::hours(offset_hours);
                let remaining = remaining_trial_days_at(Some(start), limit, now()).unwrap();
                assert!(remaining <= limit, "limit={limit} offset={offset_hours}h");
            }
        }
    }

    // Anomalia conhecida: a diferença é absoluta, então um início no futuro
    // consome dias do teste da mesma forma que um início no passado.
    #[test]
    fn future_start_is_treated_like_past_start() {
        for days in [1_i64, 5, 14, 40] {
            let past = remaining_trial_days_at(Some(now() - Duration::days(days)), 15, now());
            let future = remaining_trial_days_at(Some(now() + Duration::days(days)), 15, now());
            assert_eq!(past, future, "d={days}");
        }
    }

    #[test]
    fn inactivity_counts_whole_days_up() {
        assert_eq!(days_since_last_activity_at(None, now()), 0);
        assert_eq!(days_since_last_activity_at(Some(now()), now()), 0);
        assert_eq!(days_since_last_activity_at(Some(now() - Duration::hours(2)), now()), 1);
        assert_eq!(days_since_last_activity_at(Some(now() - Duration::days(10)), now()), 10);
        // sem limite superior
        assert_eq!(days_since_last_activity_at(Some(now() - Duration::days(400)), now()), 400);
    }

    #[test]
    fn wall_clock_variants_delegate() {
        assert_eq!(remaining_trial_days(None, 10), None);
        assert_eq!(days_since_last_activity(None), 0);
        let recent = Utc::now() - Duration::days(2) - Duration::hours(1);
        assert_eq!(remaining_trial_days(Some(recent), 10), Some(7));
    }
}
