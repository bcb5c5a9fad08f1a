// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// HttpMailboxClient against an in-process capture server stub
#[cfg(test)]
mod http_client_tests {
    use actix_web::dev::ServerHandle;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::json;

    use rustycatcher::api::client::{HttpMailboxClient, MailboxApi};
    use rustycatcher::api::endpoints::Endpoints;
    use rustycatcher::error::CatcherError;
    use rustycatcher::models::{Format, MessageId};

    async fn list_messages() -> HttpResponse {
        HttpResponse::Ok().json(json!([
            {
                "id": 1,
                "sender": "<alice@example.com>",
                "recipients": ["<bob@example.com>"],
                "subject": "Hello",
                "created_at": "2021-01-03T13:02:03+00:00"
            },
            {
                "id": 2,
                "sender": null,
                "recipients": null,
                "subject": null,
                "created_at": null
            }
        ]))
    }

    async fn message_file(path: web::Path<String>) -> HttpResponse {
        match path.as_str() {
            "1.json" => HttpResponse::Ok().json(json!({
                "id": 1,
                "sender": "<alice@example.com>",
                "recipients": ["<bob@example.com>", "<carol@example.com>"],
                "subject": "Hello",
                "created_at": "2021-01-03T13:02:03+00:00",
                "formats": ["source", "html", "plain"],
                "attachments": [
                    { "cid": "part-1", "type": "image/png", "filename": "logo.png" }
                ]
            })),
            "broken.json" => HttpResponse::Ok()
                .content_type("application/json")
                .body("{ not json"),
            _ => HttpResponse::NotFound().finish(),
        }
    }

    async fn delete_message(path: web::Path<String>) -> HttpResponse {
        if path.as_str() == "1" {
            HttpResponse::NoContent().finish()
        } else {
            HttpResponse::NotFound().finish()
        }
    }

    async fn clear_messages() -> HttpResponse {
        HttpResponse::NoContent().finish()
    }

    async fn refuse_quit() -> HttpResponse {
        HttpResponse::InternalServerError().finish()
    }

    async fn start_server() -> (HttpMailboxClient, ServerHandle) {
        let server = HttpServer::new(|| {
            App::new()
                .route("/messages", web::get().to(list_messages))
                .route("/messages", web::delete().to(clear_messages))
                .route("/messages/{file}", web::get().to(message_file))
                .route("/messages/{id}", web::delete().to(delete_message))
                .route("/", web::delete().to(refuse_quit))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind test server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let endpoints = Endpoints::new(&format!("http://{}", addr)).unwrap();
        (HttpMailboxClient::new(endpoints).unwrap(), handle)
    }

    #[actix_web::test]
    async fn test_list_messages() {
        let (client, handle) = start_server().await;

        let messages = client.list_messages().await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, MessageId::from(1));
        assert_eq!(messages[0].subject.as_deref(), Some("Hello"));
        assert_eq!(messages[1].sender, None);
        assert!(messages[1].recipients.is_empty());
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_message_detail() {
        let (client, handle) = start_server().await;

        let detail = client.message_detail(&MessageId::from(1)).await.unwrap();

        assert_eq!(detail.formats, vec![Format::Source, Format::Html, Format::Plain]);
        assert_eq!(detail.recipients.len(), 2);
        assert_eq!(detail.attachments[0].classes(), "image image-png");
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_missing_detail_is_status_error() {
        let (client, handle) = start_server().await;

        let err = client.message_detail(&MessageId::from(99)).await.unwrap_err();

        assert!(matches!(err, CatcherError::Status { status: 404, .. }));
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_malformed_detail_is_decode_error() {
        let (client, handle) = start_server().await;

        let err = client
            .message_detail(&MessageId::new("broken"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatcherError::Decode(_)));
        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_mutations_report_success_only_for_2xx() {
        let (client, handle) = start_server().await;

        assert!(client.delete_message(&MessageId::from(1)).await.is_ok());
        assert!(client
            .delete_message(&MessageId::from(2))
            .await
            .unwrap_err()
            .is_status());
        assert!(client.clear_messages().await.is_ok());
        assert!(matches!(
            client.quit().await,
            Err(CatcherError::Status { status: 500, .. })
        ));
        handle.stop(true).await;
    }
}
