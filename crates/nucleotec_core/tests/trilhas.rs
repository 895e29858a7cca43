use nucleotec_core::db::open_db_in_memory;
use nucleotec_core::{
    ConsultorDraft, EmpresaDraft, EntityId, FichaDraft, RegistryService, ServiceError,
    SqliteRegistryRepository, SqliteTrilhaRepository, TrilhaService, TrilhaStatus,
};
use rusqlite::Connection;

struct Seed {
    empresa: EntityId,
    fichas: Vec<EntityId>,
    consultor: EntityId,
}

fn seed(conn: &Connection) -> Seed {
    let registry = RegistryService::new(SqliteRegistryRepository::try_new(conn).unwrap());
    let empresa = registry
        .create_empresa(&EmpresaDraft::new("Café do Porto", "11222333000144"))
        .unwrap()
        .id;
    let fichas = ["Vendas", "Custos", "atendimento"]
        .into_iter()
        .map(|titulo| registry.create_ficha(&FichaDraft::new(titulo)).unwrap().id)
        .collect();
    let consultor = registry
        .create_consultor(&ConsultorDraft::new("Daniela"))
        .unwrap()
        .id;
    Seed {
        empresa,
        fichas,
        consultor,
    }
}

#[test]
fn added_trilha_starts_pending_without_date() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());

    let trilha = trilhas
        .add(seed.empresa, seed.fichas[0], Some(seed.consultor))
        .unwrap();

    assert_eq!(trilha.status, TrilhaStatus::Pendente);
    assert_eq!(trilha.data_execucao, None);
    assert_eq!(trilhas.get(trilha.id).unwrap(), trilha);
}

#[test]
fn same_ficha_twice_for_one_empresa_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    trilhas.add(seed.empresa, seed.fichas[0], None).unwrap();

    let err = trilhas.add(seed.empresa, seed.fichas[0], None).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test]
fn unknown_empresa_or_ficha_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());

    let err = trilhas.add(500, seed.fichas[0], None).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    let err = trilhas.add(seed.empresa, 500, None).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test]
fn listing_resolves_names() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    trilhas
        .add(seed.empresa, seed.fichas[0], Some(seed.consultor))
        .unwrap();
    trilhas.add(seed.empresa, seed.fichas[1], None).unwrap();

    let listed = trilhas.list().unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].empresa_nome, "Café do Porto");
    assert_eq!(listed[0].ficha_titulo, "Vendas");
    assert_eq!(listed[0].consultor_nome.as_deref(), Some("Daniela"));
    assert_eq!(listed[1].ficha_titulo, "Custos");
    assert_eq!(listed[1].consultor_nome, None);
}

#[test]
fn history_is_ordered_by_ficha_title() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    for &ficha in &seed.fichas {
        trilhas.add(seed.empresa, ficha, None).unwrap();
    }

    let titles: Vec<String> = trilhas
        .history(seed.empresa)
        .unwrap()
        .into_iter()
        .map(|entry| entry.ficha_titulo)
        .collect();

    assert_eq!(titles, vec!["atendimento", "Custos", "Vendas"]);
    assert!(trilhas.history(9_999).unwrap().is_empty());
}

#[test]
fn concluding_without_date_stamps_the_clock() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    let trilha = trilhas.add(seed.empresa, seed.fichas[0], None).unwrap();

    let done = trilhas
        .update_status_at(trilha.id, TrilhaStatus::Concluida, None, 1_700_000_000_000)
        .unwrap();

    assert_eq!(done.status, TrilhaStatus::Concluida);
    assert_eq!(done.data_execucao, Some(1_700_000_000_000));
    assert_eq!(trilhas.get(trilha.id).unwrap(), done);
}

#[test]
fn explicit_date_wins_and_pending_clears_it() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    let trilha = trilhas.add(seed.empresa, seed.fichas[0], None).unwrap();

    let started = trilhas
        .update_status_at(trilha.id, TrilhaStatus::EmAndamento, Some(42), 1_000)
        .unwrap();
    assert_eq!(started.data_execucao, Some(42));

    let cancelled = trilhas
        .update_status_at(trilha.id, TrilhaStatus::Cancelada, None, 1_000)
        .unwrap();
    assert_eq!(cancelled.data_execucao, Some(42));

    let reset = trilhas
        .update_status_at(trilha.id, TrilhaStatus::Pendente, Some(99), 1_000)
        .unwrap();
    assert_eq!(reset.data_execucao, None);
    assert_eq!(trilhas.get(trilha.id).unwrap().data_execucao, None);
}

#[test]
fn assign_consultor_sets_and_clears() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    let trilha = trilhas.add(seed.empresa, seed.fichas[0], None).unwrap();

    let assigned = trilhas
        .assign_consultor(trilha.id, Some(seed.consultor))
        .unwrap();
    assert_eq!(assigned.consultor_id, Some(seed.consultor));

    let cleared = trilhas.assign_consultor(trilha.id, None).unwrap();
    assert_eq!(cleared.consultor_id, None);
}

#[test]
fn missing_trilha_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());

    let err = trilhas
        .update_status_at(31, TrilhaStatus::Concluida, None, 0)
        .unwrap_err();
    assert!(matches!(err, ServiceError::TrilhaNotFound(31)));
    let err = trilhas.assign_consultor(31, None).unwrap_err();
    assert!(matches!(err, ServiceError::TrilhaNotFound(31)));
}

#[test]
fn single_view_matches_listing_row() {
    let conn = open_db_in_memory().unwrap();
    let seed = seed(&conn);
    let trilhas = TrilhaService::new(SqliteTrilhaRepository::try_new(&conn).unwrap());
    let trilha = trilhas
        .add(seed.empresa, seed.fichas[2], Some(seed.consultor))
        .unwrap();

    let view = trilhas.get_view(trilha.id).unwrap();

    assert_eq!(trilhas.list().unwrap(), vec![view.clone()]);
    assert_eq!(view.ficha_titulo, "atendimento");
    assert!(matches!(
        trilhas.get_view(trilha.id + 1),
        Err(ServiceError::TrilhaNotFound(_))
    ));
}
