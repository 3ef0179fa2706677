#![cfg(unix)]

mod common;

use common::{fake_tool, tool_calls, TestEnv};

const AWS_DOWN: &str = "echo 'Could not connect to the endpoint URL' >&2\nexit 255";

const AWS_EMPTY_TABLE: &str = r#"case "$2" in
  get-item) echo '{}' ;;
  *) ;;
esac"#;

const AWS_LOCK_HELD: &str = r#"case "$2" in
  get-item) echo '{"Item":{"lock_id":{"S":"deployment-orders"},"locked_by":{"S":"bob@ci-7"},"expiry_time":{"N":"4102444800"},"created_at":{"N":"4102443000"},"stack_name":{"S":"orders"}}}' ;;
  *) ;;
esac"#;

#[test]
fn test_release_always_exits_0() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_DOWN);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["lock", "release", "orders"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    assert!(result.stderr.contains("failed to release deployment lock"));
}

#[test]
fn test_release_with_invalid_stack_still_exits_0() {
    let env = TestEnv::new();
    let result = env.run(&["lock", "release", "no spaces allowed"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
}

#[test]
fn test_acquire_prints_lock_id() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_EMPTY_TABLE);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["lock", "acquire", "orders", "--lock-table", "team-locks"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    assert_eq!(result.stdout.trim(), "deployment-orders");

    let calls = tool_calls(env.project_root.path(), "aws");
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("dynamodb get-item --consistent-read --table-name team-locks"));
    assert!(calls[1].contains("put-item"));
    assert!(calls[1].contains("attribute_not_exists(lock_id)"));
    assert!(calls[1].contains("--region ap-northeast-2"));
}

#[test]
fn test_acquire_against_held_lock_names_holder() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_LOCK_HELD);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["lock", "acquire", "orders"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("held by bob@ci-7"), "{}", result.stderr);
    assert!(result.stderr.contains("2100-01-01"), "{}", result.stderr);
    // Never attempted to create over a live lock
    assert_eq!(tool_calls(env.project_root.path(), "aws").len(), 1);
}

#[test]
fn test_acquire_json_error_code() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_LOCK_HELD);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["--json", "lock", "acquire", "orders"]);

    assert_eq!(result.exit_code, 1);
    let events = result.json_lines();
    assert_eq!(events[0]["event"], "error");
    assert_eq!(events[0]["code"], "LOCK_HELD");
}

#[test]
fn test_acquire_with_store_down_exits_1() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_DOWN);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["lock", "acquire", "orders"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("lock store error for stack 'orders'"));
    assert_eq!(
        result.stderr.matches("Could not connect").count(),
        1,
        "{}",
        result.stderr
    );
}

#[test]
fn test_acquire_rejects_zero_timeout_before_touching_the_table() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_EMPTY_TABLE);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["lock", "acquire", "orders", "--timeout-minutes", "0"]);

    assert_eq!(result.exit_code, 1, "{}", result.combined_output());
    assert!(tool_calls(env.project_root.path(), "aws").is_empty());
}

#[test]
fn test_acquire_rejects_empty_region_flag() {
    let env = TestEnv::new();
    let aws = fake_tool(env.project_root.path(), "aws", AWS_EMPTY_TABLE);
    let env = env.with_env("STACKKIT_AWS_BIN", &aws);

    let result = env.run(&["--json", "lock", "acquire", "orders", "--region", ""]);

    assert_eq!(result.exit_code, 1, "{}", result.combined_output());
    let events = result.json_lines();
    assert_eq!(events[0]["code"], "INVALID_CONFIG");
    assert!(tool_calls(env.project_root.path(), "aws").is_empty());
}
