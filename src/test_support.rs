//! 单元测试用的示例数据

use serde_json::{json, Value};

use crate::models::{Envelope, QuestionKind};

/// 每种题型一个最小合法信封
pub fn sample_json(kind: QuestionKind) -> Value {
    let (prompt, detail) = match kind {
        QuestionKind::McqSingle => (
            "2 + 2 = ?",
            json!({
                "options": [
                    {"id": "A", "text": "2", "correct": false},
                    {"id": "B", "text": "4", "correct": true}
                ],
                "shuffle": true
            }),
        ),
        QuestionKind::FibSingle => (
            "Thủ đô của Việt Nam là ____",
            json!({"answer": "Hà Nội", "case_sensitive": false, "normalize_space": true}),
        ),
        QuestionKind::ImageChoice => (
            "Con nào là con mèo?",
            json!({
                "options": [
                    {"id": "A", "image": {"url": "https://cdn.example.com/cat.png", "alt": "mèo"}, "correct": true},
                    {"id": "B", "image": {"url": "https://cdn.example.com/dog.png", "alt": "chó"}, "correct": false}
                ],
                "shuffle": false
            }),
        ),
        QuestionKind::MultipleFillIn => (
            "Điền số thích hợp",
            json!({
                "blocks": [
                    {"type": "text", "value": "3 + "},
                    {"type": "blank", "id": "b1"},
                    {"type": "text", "value": " = 5, 10 - "},
                    {"type": "blank", "id": "b2"},
                    {"type": "text", "value": " = 4"}
                ],
                "answers": [
                    {"id": "b1", "expression": "2"},
                    {"id": "b2", "expression": "6"}
                ]
            }),
        ),
        QuestionKind::VerticalCalculation => (
            "",
            json!({
                "layout": {"rows": ["245", "132"], "operator": "addition", "mode": "single"},
                "result": "377"
            }),
        ),
        QuestionKind::Expression => (
            "",
            json!({
                "operation": "division",
                "operand1": "12",
                "operand2": "4",
                "result": "3",
                "mode": "blank_result"
            }),
        ),
        QuestionKind::MatchingPairs => (
            "Nối con vật với tiếng kêu",
            json!({
                "columns": [
                    {"title": "Con vật", "items": [{"id": "l1", "text": "Mèo"}, {"id": "l2", "text": "Chó"}]},
                    {"title": "Tiếng kêu", "items": [{"id": "r1", "text": "Meo meo"}, {"id": "r2", "text": "Gâu gâu"}]}
                ],
                "pairs": [{"left": "l1", "right": "r1"}, {"left": "l2", "right": "r2"}],
                "allowPartialCredit": true
            }),
        ),
    };

    json!({
        "version": 1,
        "kind": kind.tag(),
        "prompt": prompt,
        "media": [],
        "detail": detail,
        "hints": [],
        "scoring": {"full_points": 1, "partial_points": 0, "penalty": 0},
        "meta": {}
    })
}

pub fn envelope(kind: QuestionKind) -> Envelope {
    serde_json::from_value(sample_json(kind)).expect("sample envelope decodes")
}
