use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shareledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shareledger").unwrap();
    cmd.env("SHARELEDGER_DATA_DIR", dir.path())
        .env_remove("SHARELEDGER_LOG");
    cmd
}

fn sample_ledger() -> TempDir {
    let dir = TempDir::new().unwrap();
    shareledger(&dir)
        .args(["init", "--sample"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex"));
    dir
}

#[test]
fn summary_shows_group_total_and_active_net() {
    let dir = sample_ledger();

    shareledger(&dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("$240.00"))
        .stdout(predicate::str::contains("Your Share:"))
        .stdout(predicate::str::contains("$80.00"))
        .stdout(predicate::str::contains("you owe"));
}

#[test]
fn balance_net_for_each_member() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["balance", "net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex: $5.00 (you owe)"));

    shareledger(&dir)
        .args(["balance", "net", "Casey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Casey: $40.00 (to receive)"));
}

#[test]
fn adding_an_expense_moves_balances() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args([
            "expense",
            "add",
            "Taxi",
            "30",
            "--paid-by",
            "Blake",
            "--split",
            "Alex,Blake",
            "--category",
            "transportation",
            "--date",
            "2023-10-22",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 2 ways: $15.00 each"));

    // Alex was at -5 and now owes Blake another 15
    shareledger(&dir)
        .args(["balance", "net", "Alex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex: $20.00 (you owe)"));

    shareledger(&dir)
        .args(["expense", "list", "--category", "transportation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi"))
        .stdout(predicate::str::contains("1 record(s)"));
}

#[test]
fn invalid_amount_is_rejected() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["expense", "add", "Nothing", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be positive"));
}

#[test]
fn oversized_amount_is_rejected() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["expense", "add", "Everything", "79228162514264337593543950335"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount too large"));

    shareledger(&dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("$240.00"));
}

#[test]
fn user_in_use_cannot_be_deleted() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["user", "delete", "Blake"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced by"));

    shareledger(&dir)
        .args(["user", "add", "Dana"])
        .assert()
        .success();

    shareledger(&dir)
        .args(["user", "delete", "Dana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted user: Dana"));
}

#[test]
fn export_then_import_into_fresh_ledger() {
    let source = sample_ledger();
    let dump = source.path().join("dump.json");

    shareledger(&source)
        .args(["export", "all"])
        .arg(&dump)
        .assert()
        .success();

    let target = TempDir::new().unwrap();
    shareledger(&target)
        .arg("import")
        .arg(&dump)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Import Preview"));

    shareledger(&target)
        .arg("import")
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("Expenses:           3"));

    shareledger(&target)
        .args(["balance", "net", "user3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$40.00 (to receive)"));
}

#[test]
fn balances_csv_to_stdout() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["export", "balances", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debtor ID,Debtor,Creditor ID,Creditor,Amount"))
        .stdout(predicate::str::contains("user1,Alex,user3,Casey,40.00"));
}

#[test]
fn history_records_changes() {
    let dir = sample_ledger();

    shareledger(&dir)
        .args(["user", "rename", "Alex", "Alexandra"])
        .assert()
        .success();

    shareledger(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE User user1"));
}
