mod support;

use archive_registry::service::{HandlerError, Registry, Service, Session, AUTHORIZATION_HEADER};
use archive_registry::{InMemoryAuthenticator, Role};
use serde_json::{json, Value};
use support::{sign_in, FlakyStore, PASSWORD};

struct Harness {
    service: Service<Registry<FlakyStore>>,
    auth: InMemoryAuthenticator,
    admin: Session,
    viewer: Session,
}

fn harness() -> Harness {
    let (service, auth) = support::service();
    let admin = sign_in(&service, &auth, "jefe@archivo.org", Role::Admin);
    let viewer = sign_in(&service, &auth, "lectora@archivo.org", Role::Viewer);
    Harness {
        service,
        auth,
        admin,
        viewer,
    }
}

fn add(h: &Harness, item: i64, name: &str) -> String {
    let record = h
        .service
        .dispatch(
            "files.add",
            json!({
                "itemNumber": item,
                "name": name,
                "storageUnit": "CARPETA",
                "support": "PAPEL",
                "folioStart": 1,
                "folioEnd": 10,
            }),
            h.admin.clone(),
        )
        .unwrap();
    record["id"].as_str().unwrap().to_string()
}

#[test]
fn registers_every_command() {
    let h = harness();
    let commands = h.service.commands();
    for name in [
        "auth.login",
        "auth.logout",
        "auth.me",
        "files.load",
        "files.list",
        "files.add",
        "files.update",
        "files.delete",
        "files.delete_many",
        "files.borrow",
        "files.return",
        "files.retain",
        "files.release",
        "files.export",
        "files.import",
        "files.template",
    ] {
        assert!(commands.contains(&name), "{} missing", name);
    }
}

#[test]
fn admin_lending_workflow() {
    let h = harness();
    let id = add(&h, 1, "Actas");

    let borrowed = h
        .service
        .dispatch("files.borrow", json!({ "id": id, "borrower": "Ana" }), h.admin.clone())
        .unwrap();
    assert_eq!(borrowed["status"], "PRESTADO");
    assert_eq!(borrowed["borrowedTo"], "Ana");

    let returned = h
        .service
        .dispatch("files.return", json!({ "id": id }), h.admin.clone())
        .unwrap();
    assert_eq!(returned["status"], "DISPONIBLE");
    assert_eq!(returned["borrowedTo"], Value::Null);

    let retained = h
        .service
        .dispatch("files.retain", json!({ "id": id, "reason": "Auditoría" }), h.admin.clone())
        .unwrap();
    assert_eq!(retained["status"], "RETENIDO");
    assert_eq!(retained["retentionReason"], "Auditoría");

    let released = h
        .service
        .dispatch("files.release", json!({ "id": id }), h.admin.clone())
        .unwrap();
    assert_eq!(released["status"], "DISPONIBLE");
}

#[test]
fn viewers_read_but_cannot_write() {
    let h = harness();
    let id = add(&h, 1, "Actas");

    let page = h.service.dispatch("files.list", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(page["total"], 1);

    let err = h
        .service
        .dispatch("files.borrow", json!({ "id": id, "borrower": "Ana" }), h.viewer.clone())
        .unwrap_err();
    assert!(matches!(err, HandlerError::Forbidden(_)));
    assert_eq!(err.status_code(), 403);

    let err = h.service.dispatch("files.list", json!({}), Session::new()).unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[test]
fn registry_errors_keep_their_status_codes() {
    let h = harness();
    let id = add(&h, 1, "Actas");
    h.service
        .dispatch("files.retain", json!({ "id": id, "reason": "Revisión" }), h.admin.clone())
        .unwrap();

    let conflict = h
        .service
        .dispatch("files.borrow", json!({ "id": id, "borrower": "Ana" }), h.admin.clone())
        .unwrap_err();
    assert_eq!(conflict.status_code(), 409);

    let missing = h
        .service
        .dispatch("files.return", json!({ "id": "nope" }), h.admin.clone())
        .unwrap_err();
    assert_eq!(missing.status_code(), 404);

    let invalid = h
        .service
        .dispatch("files.add", json!({ "name": "Sin soporte" }), h.admin.clone())
        .unwrap_err();
    assert_eq!(invalid.status_code(), 400);

    let guard = h
        .service
        .dispatch("files.borrow", json!({ "id": id }), h.admin.clone())
        .unwrap_err();
    assert!(matches!(guard, HandlerError::GuardRejected(_)));
}

#[test]
fn persistence_failures_map_to_bad_gateway() {
    let h = harness();
    let id = add(&h, 1, "Actas");
    h.service.state().store().unwrap().backend().fail_writes(true);

    let err = h.service.dispatch("files.delete", json!({ "id": id }), h.admin.clone()).unwrap_err();
    assert_eq!(err.status_code(), 502);
}

#[test]
fn list_filters_and_pages() {
    let h = harness();
    for i in 1..=25 {
        add(&h, i, if i % 5 == 0 { "Actas" } else { "Informes" });
    }

    let page = h
        .service
        .dispatch(
            "files.list",
            json!({ "filters": { "name": "informes" }, "pageSize": 10, "pageIndex": 1 }),
            h.viewer.clone(),
        )
        .unwrap();
    assert_eq!(page["total"], 20);
    assert_eq!(page["pageCount"], 2);
    assert_eq!(page["pageIndex"], 1);
    assert_eq!(page["records"].as_array().unwrap().len(), 10);

    let err = h
        .service
        .dispatch("files.list", json!({ "filters": { "color": "rojo" } }), h.viewer.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = h
        .service
        .dispatch("files.list", json!({ "pageSize": 7 }), h.viewer.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn delete_many_reports_each_id() {
    let h = harness();
    let a = add(&h, 1, "A");
    let b = add(&h, 2, "B");
    h.service.state().store().unwrap().backend().fail_delete_of(&b);

    let summary = h
        .service
        .dispatch("files.delete_many", json!({ "ids": [a, b] }), h.admin.clone())
        .unwrap();
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["failures"][0]["item"], b);
}

#[test]
fn export_and_import_round_trip() {
    let h = harness();
    let template = h.service.dispatch("files.template", json!({}), h.viewer.clone()).unwrap();
    let columns = template["columns"].as_array().unwrap();
    let rows: Vec<Value> = template["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|cells| {
            let object: serde_json::Map<String, Value> = columns
                .iter()
                .zip(cells.as_array().unwrap())
                .map(|(c, v)| (c.as_str().unwrap().to_string(), v.clone()))
                .collect();
            Value::Object(object)
        })
        .collect();

    let summary = h
        .service
        .dispatch("files.import", json!({ "rows": rows }), h.admin.clone())
        .unwrap();
    assert_eq!(summary["succeeded"], 3);

    let export = h
        .service
        .dispatch("files.export", json!({ "year": 2024, "all": true }), h.viewer.clone())
        .unwrap();
    assert_eq!(export["fileName"], "archivos_2024.json");
    assert_eq!(export["rows"], 3);

    let none = h
        .service
        .dispatch("files.export", json!({ "year": 1999 }), h.viewer.clone())
        .unwrap();
    assert_eq!(none["rows"], 0);
}

#[test]
fn role_comes_from_the_directory_not_the_caller() {
    let h = harness();

    // Self-declared identity headers carry no weight
    let mut spoofed = Session::new();
    spoofed.set("x-registry-user-id", "anyone");
    spoofed.set("x-registry-role", "admin");
    let err = h
        .service
        .dispatch("files.add", json!({ "name": "Actas" }), spoofed)
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    let mut forged = Session::new();
    forged.set(AUTHORIZATION_HEADER, "Bearer not-issued-by-us");
    let err = h.service.dispatch("files.load", json!({}), forged).unwrap_err();
    assert_eq!(err.status_code(), 401);

    let me = h.service.dispatch("auth.me", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(me["role"], "viewer");
    let err = h
        .service
        .dispatch("files.add", json!({ "name": "Actas" }), h.viewer.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // Promotion applies to the already open session
    let uid = me["uid"].as_str().unwrap();
    h.auth.set_role(uid, Role::Admin).unwrap();
    let loaded = h.service.dispatch("files.load", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(loaded["count"], 0);
    let me = h.service.dispatch("auth.me", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(me["role"], "admin");
}

#[test]
fn login_rejects_bad_credentials_and_logout_revokes() {
    let h = harness();

    let err = h
        .service
        .dispatch(
            "auth.login",
            json!({ "email": "jefe@archivo.org", "password": "adivinada" }),
            Session::new(),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    let login = h
        .service
        .dispatch(
            "auth.login",
            json!({ "email": "JEFE@archivo.org", "password": PASSWORD }),
            Session::new(),
        )
        .unwrap();
    assert_eq!(login["profile"]["role"], "admin");
    let session = Session::with_token(login["token"].as_str().unwrap());

    h.service.dispatch("auth.logout", json!({}), session.clone()).unwrap();
    let err = h.service.dispatch("files.load", json!({}), session).unwrap_err();
    assert_eq!(err.status_code(), 401);

    // Other sessions of the same user stay open
    h.service.dispatch("files.load", json!({}), h.admin.clone()).unwrap();
}

#[test]
fn each_session_keeps_its_own_view() {
    let h = harness();
    add(&h, 1, "Actas de Reunión");
    add(&h, 2, "Informes");
    add(&h, 3, "Correspondencia");

    let narrowed = h
        .service
        .dispatch("files.list", json!({ "filters": { "name": "actas" } }), h.admin.clone())
        .unwrap();
    assert_eq!(narrowed["total"], 1);

    let other = h.service.dispatch("files.list", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(other["total"], 3);
    assert_eq!(other["filters"], json!({ "filters": {} }));

    // The first session still has its filter
    let again = h.service.dispatch("files.list", json!({}), h.admin.clone()).unwrap();
    assert_eq!(again["total"], 1);

    let export = h.service.dispatch("files.export", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(export["rows"], 3);
    let export = h.service.dispatch("files.export", json!({}), h.admin.clone()).unwrap();
    assert_eq!(export["rows"], 1);
}

#[test]
fn rejected_list_input_leaves_the_view_alone() {
    let h = harness();
    for i in 1..=25 {
        add(&h, i, "Serie");
    }
    h.service
        .dispatch("files.list", json!({ "pageIndex": 2 }), h.viewer.clone())
        .unwrap();

    let err = h
        .service
        .dispatch(
            "files.list",
            json!({ "filters": { "name": "x", "color": "rojo" }, "pageSize": 20 }),
            h.viewer.clone(),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let page = h.service.dispatch("files.list", json!({}), h.viewer.clone()).unwrap();
    assert_eq!(page["pageIndex"], 2);
    assert_eq!(page["pageSize"], 10);
    assert_eq!(page["total"], 25);
}
