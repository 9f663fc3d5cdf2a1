use cushions::document::{content_hash, read_paragraphs, split_paragraphs};
use cushions::error::CushionsError;
use speculate2::speculate;
use std::fs;
use tempfile::TempDir;

speculate! {
    describe "split_paragraphs" {
        it "drops heading lines and keeps the body" {
            let paragraphs = split_paragraphs("# Heading\nBody text here.\n\nSecond paragraph.");
            assert_eq!(paragraphs, vec!["Body text here.", "Second paragraph."]);
        }

        it "splits a short document with a heading block" {
            let paragraphs = split_paragraphs("Hello world.\n\nThis is fine!\n\n# Heading\nBody text here.");
            assert_eq!(paragraphs, vec!["Hello world.", "This is fine!", "Body text here."]);
        }

        it "keeps the text of a heading that stands alone" {
            let paragraphs = split_paragraphs("# Chapter One\n\nBody.");
            assert_eq!(paragraphs, vec!["Chapter One", "Body."]);
        }

        it "drops a heading written without a space before its body" {
            let paragraphs = split_paragraphs("##Heading\nBody");
            assert_eq!(paragraphs, vec!["Body"]);
        }

        it "returns nothing for empty or whitespace-only input" {
            assert!(split_paragraphs("").is_empty());
            assert!(split_paragraphs("   \n\n\t\n").is_empty());
        }

        it "returns nothing for a document made only of heading markers" {
            assert!(split_paragraphs("#\n\n###\n\n  ##  \n# #").is_empty());
        }

        it "treats several blank lines as one separator" {
            let paragraphs = split_paragraphs("one\n\n\n\ntwo\n \n\t\nthree");
            assert_eq!(paragraphs, vec!["one", "two", "three"]);
        }

        it "keeps line breaks inside a paragraph" {
            let paragraphs = split_paragraphs("first line\nsecond line\n\nnext");
            assert_eq!(paragraphs, vec!["first line\nsecond line", "next"]);
        }

        it "strips leading markers even without a space" {
            let paragraphs = split_paragraphs("#idea worth keeping");
            assert_eq!(paragraphs, vec!["idea worth keeping"]);
        }

        it "accepts windows line endings" {
            let paragraphs = split_paragraphs("one\r\n\r\ntwo\r\n");
            assert_eq!(paragraphs, vec!["one", "two"]);
        }

        it "is stable when its output is joined and split again" {
            let raw = "Intro line\n\n# Heading\nBody\nmore body\n\n## Only heading\n\n  trailing  \n";
            let once = split_paragraphs(raw);
            let twice = split_paragraphs(&once.join("\n\n"));
            assert_eq!(once, twice);
            assert_eq!(once, vec!["Intro line", "Body\nmore body", "Only heading", "trailing"]);
        }
    }

    describe "content_hash" {
        it "is the md5 hex digest of the text" {
            assert_eq!(content_hash("Hello world.").as_str(), "764569e58f53ea8b6404f6fa7fc0247f");
        }

        it "is identical for identical text" {
            assert_eq!(content_hash("same words"), content_hash("same words"));
            assert_ne!(content_hash("same words"), content_hash("same words "));
        }
    }

    describe "read_paragraphs" {
        before {
            let dir = TempDir::new().expect("Failed to create temp dir");
        }

        it "reads and splits a file" {
            let path = dir.path().join("notes.md");
            fs::write(&path, "# Notes\nFirst.\n\nSecond.").unwrap();

            let paragraphs = read_paragraphs(&path).expect("Failed to read");
            assert_eq!(paragraphs, vec!["First.", "Second."]);
        }

        it "reports a missing file with its path" {
            let path = dir.path().join("missing.md");
            match read_paragraphs(&path) {
                Err(CushionsError::File { path: reported, .. }) => assert_eq!(reported, path),
                other => panic!("expected file error, got {:?}", other),
            }
        }
    }
}
