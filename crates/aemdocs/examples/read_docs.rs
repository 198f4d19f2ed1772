//! Example: Read a few live documentation pages and check the results
//!
//! Run with: cargo run -p aemdocs --example read_docs
//!
//! Needs network access. Covers each kind of URL the reader handles.

use aemdocs::{DocumentRequest, Tool};

/// Live check definition
struct Case {
    url: &'static str,
    description: &'static str,
    expect_contains: &'static str,
}

const CASES: &[Case] = &[
    Case {
        url: "https://sling.apache.org/documentation/bundles/models.html",
        description: "Apache Sling documentation page",
        expect_contains: "Sling Models",
    },
    Case {
        url: "https://experienceleague.adobe.com/en/docs/experience-manager-cloud-service/content/overview/introduction",
        description: "Experience League page",
        expect_contains: "Documentation from",
    },
    Case {
        url: "https://github.com/adobe/aem-project-archetype",
        description: "GitHub repository",
        expect_contains: "archetype",
    },
    Case {
        url: "https://adapt.to/2025/presentations/adaptto-2025-challenges-when-operating-1000-different-aem-applications.pdf",
        description: "adaptTo() PDF (guidance, no fetch)",
        expect_contains: "## adaptTo() Presentation",
    },
    Case {
        url: "https://www.youtube.com/watch?v=nJ8QTNQEkD8",
        description: "YouTube video (guidance, no fetch)",
        expect_contains: "**Video ID**: nJ8QTNQEkD8",
    },
];

#[tokio::main]
async fn main() {
    println!("aemdocs live examples");
    println!("=====================\n");

    let tool = Tool::default();
    println!("Session: {}\n", tool.session());

    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        let text = tool
            .read_documentation(DocumentRequest::new(case.url).max_length(2_000))
            .await;

        let preview: String = text.chars().take(120).collect();
        println!("   Preview: {}", preview.replace('\n', " "));

        if text.contains(case.expect_contains) {
            println!("   ✓ PASS\n");
        } else {
            println!("   Expected output to contain '{}'", case.expect_contains);
            println!("   ✗ FAIL\n");
            failed += 1;
        }
    }

    tool.shutdown().await;

    println!("=====================");
    println!("Results: {} passed, {} failed", CASES.len() - failed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}
