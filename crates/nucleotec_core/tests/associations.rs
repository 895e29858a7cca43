use nucleotec_core::db::open_db_in_memory;
use nucleotec_core::{
    reconcile_with_mode, selection_view, AssociationKind, AssociationService, AssociationStore,
    CatalogKind, CatalogRepository, EmpresaDraft, EntityId, EntityKind, FichaDraft,
    ReconcileMode, RegistryRepository, RowOp, SqliteAssociationStore, SqliteCatalogRepository,
    SqliteRegistryRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

fn seed_catalog(conn: &Connection, kind: CatalogKind, names: &[&str]) -> Vec<EntityId> {
    let repo = SqliteCatalogRepository::try_new(conn).unwrap();
    names
        .iter()
        .map(|name| repo.create_item(kind, name).unwrap().id)
        .collect()
}

fn seed_ficha(conn: &Connection, titulo: &str) -> EntityId {
    let repo = SqliteRegistryRepository::try_new(conn).unwrap();
    repo.create_ficha(&FichaDraft::new(titulo)).unwrap().id
}

#[test]
fn publico_alvo_matches_selection_after_reconcile() {
    let conn = open_db_in_memory().unwrap();
    let portes = seed_catalog(&conn, CatalogKind::Porte, &["MEI", "ME", "EPP", "Média"]);
    let ficha = seed_ficha(&conn, "Gestão financeira");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    service
        .set_publico_alvo(ficha, [portes[0], portes[1], portes[2]])
        .unwrap();
    let report = service
        .set_publico_alvo(ficha, [portes[1], portes[2], portes[3]])
        .unwrap();

    assert_eq!(report.removed, vec![portes[0]]);
    assert_eq!(report.added, vec![portes[3]]);
    assert_eq!(
        service.assigned(AssociationKind::PublicoAlvo, ficha).unwrap(),
        BTreeSet::from([portes[1], portes[2], portes[3]])
    );
}

#[test]
fn reconcile_twice_keeps_rows_and_applies_nothing() {
    let conn = open_db_in_memory().unwrap();
    let setores = seed_catalog(&conn, CatalogKind::Setor, &["Comércio", "Indústria"]);
    let ficha = seed_ficha(&conn, "Marketing digital");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    service.set_setores_indicados(ficha, setores.clone()).unwrap();
    let second = service.set_setores_indicados(ficha, setores.clone()).unwrap();

    assert_eq!(second.applied_count(), 0);
    assert!(second.is_complete());
}

#[test]
fn relations_of_one_ficha_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let setores = seed_catalog(&conn, CatalogKind::Setor, &["Serviços"]);
    let segmentos = seed_catalog(&conn, CatalogKind::MacroSegmento, &["Agronegócio"]);
    let ficha = seed_ficha(&conn, "Boas práticas");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    service.set_setores_indicados(ficha, setores.clone()).unwrap();
    service.set_macro_segmentos(ficha, segmentos.clone()).unwrap();
    service
        .set_setores_indicados(ficha, Vec::<EntityId>::new())
        .unwrap();

    assert!(service
        .assigned(AssociationKind::SetoresIndicados, ficha)
        .unwrap()
        .is_empty());
    assert_eq!(
        service
            .assigned(AssociationKind::MacroSegmentos, ficha)
            .unwrap(),
        segmentos.into_iter().collect()
    );
}

#[test]
fn unknown_related_id_fails_as_constraint_and_other_rows_apply() {
    let conn = open_db_in_memory().unwrap();
    let portes = seed_catalog(&conn, CatalogKind::Porte, &["ME"]);
    let ficha = seed_ficha(&conn, "Exportação");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    let report = service.set_publico_alvo(ficha, [portes[0], 999]).unwrap();

    assert_eq!(report.added, vec![portes[0]]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].op, RowOp::Link);
    assert_eq!(report.failures[0].related_id, 999);
    assert!(report.failures[0].error.is_constraint_violation());
}

#[test]
fn dangling_parent_has_no_rows_and_links_fail() {
    let conn = open_db_in_memory().unwrap();
    let portes = seed_catalog(&conn, CatalogKind::Porte, &["EPP"]);
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    let report = service.set_publico_alvo(4242, portes.clone()).unwrap();

    assert!(report.added.is_empty());
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn unlink_of_missing_pair_is_success() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteAssociationStore::try_new(&conn).unwrap();
    store
        .unlink(AssociationKind::MacroSegmentos, 1, 2)
        .unwrap();
}

#[test]
fn linking_existing_pair_twice_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let setores = seed_catalog(&conn, CatalogKind::Setor, &["Turismo"]);
    let ficha = seed_ficha(&conn, "Atendimento");
    let store = SqliteAssociationStore::try_new(&conn).unwrap();

    store
        .link(AssociationKind::SetoresIndicados, ficha, setores[0])
        .unwrap();
    let err = store
        .link(AssociationKind::SetoresIndicados, ficha, setores[0])
        .unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn atomic_mode_rolls_back_every_row_on_failure() {
    let mut conn = open_db_in_memory().unwrap();
    let portes = seed_catalog(&conn, CatalogKind::Porte, &["MEI", "ME"]);
    let ficha = seed_ficha(&conn, "Inovação");
    reconcile_with_mode(
        &mut conn,
        AssociationKind::PublicoAlvo,
        ficha,
        [portes[0]],
        ReconcileMode::Atomic,
    )
    .unwrap();

    let report = reconcile_with_mode(
        &mut conn,
        AssociationKind::PublicoAlvo,
        ficha,
        [portes[1], 777],
        ReconcileMode::Atomic,
    )
    .unwrap();

    assert!(report.rolled_back);
    assert!(!report.is_complete());
    let store = SqliteAssociationStore::try_new(&conn).unwrap();
    assert_eq!(
        store
            .list_associated(AssociationKind::PublicoAlvo, ficha)
            .unwrap(),
        BTreeSet::from([portes[0]])
    );
}

#[test]
fn best_effort_mode_keeps_successful_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let portes = seed_catalog(&conn, CatalogKind::Porte, &["MEI", "ME"]);
    let ficha = seed_ficha(&conn, "Inovação");
    reconcile_with_mode(
        &mut conn,
        AssociationKind::PublicoAlvo,
        ficha,
        [portes[0]],
        ReconcileMode::BestEffort,
    )
    .unwrap();

    let report = reconcile_with_mode(
        &mut conn,
        AssociationKind::PublicoAlvo,
        ficha,
        [portes[1], 777],
        ReconcileMode::BestEffort,
    )
    .unwrap();

    assert!(!report.rolled_back);
    let store = SqliteAssociationStore::try_new(&conn).unwrap();
    assert_eq!(
        store
            .list_associated(AssociationKind::PublicoAlvo, ficha)
            .unwrap(),
        BTreeSet::from([portes[1]])
    );
}

#[test]
fn selection_view_flags_linked_candidates_in_name_order() {
    let conn = open_db_in_memory().unwrap();
    let setores = seed_catalog(&conn, CatalogKind::Setor, &["Varejo", "Agro", "Saúde"]);
    let ficha = seed_ficha(&conn, "Gestão de estoque");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());
    service.set_setores_indicados(ficha, [setores[0]]).unwrap();

    let view = selection_view(&conn, AssociationKind::SetoresIndicados, ficha).unwrap();

    let names: Vec<&str> = view.iter().map(|entry| entry.nome.as_str()).collect();
    assert_eq!(names, vec!["Agro", "Saúde", "Varejo"]);
    let selected: Vec<EntityId> = view
        .iter()
        .filter(|entry| entry.selected)
        .map(|entry| entry.id)
        .collect();
    assert_eq!(selected, vec![setores[0]]);
}

#[test]
fn trilha_fichas_reconcile_creates_pending_rows() {
    let conn = open_db_in_memory().unwrap();
    let registry = SqliteRegistryRepository::try_new(&conn).unwrap();
    let empresa = registry
        .create_empresa(&EmpresaDraft::new("Padaria Central", "11.222.333/0001-44"))
        .unwrap();
    let first = seed_ficha(&conn, "Custos");
    let second = seed_ficha(&conn, "Vendas");
    let service = AssociationService::new(SqliteAssociationStore::try_new(&conn).unwrap());

    service.set_trilha_fichas(empresa.id, [first, second]).unwrap();

    let status: Vec<String> = conn
        .prepare("SELECT status FROM trilhas WHERE empresa_id = ?1 ORDER BY ficha_id;")
        .unwrap()
        .query_map([empresa.id], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(status, vec!["pendente", "pendente"]);
    assert_eq!(
        service.count_references(EntityKind::Empresa, empresa.id).unwrap(),
        2
    );
}
