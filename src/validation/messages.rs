//! 校验提示文案（面向越南语用户）

pub const INVALID_PAYLOAD: &str = "Dữ liệu câu hỏi không hợp lệ";
pub const INVALID_VERSION: &str = "Phiên bản không hợp lệ (phải là 1)";
pub const MISSING_KIND: &str = "Thiếu loại câu hỏi";
pub const MEDIA_NOT_ARRAY: &str = "Media phải là một mảng";
pub const MISSING_DETAIL: &str = "Thiếu dữ liệu chi tiết (detail)";
pub const INVALID_SCORING: &str = "Cấu hình điểm không hợp lệ";
pub const FULL_POINTS_POSITIVE: &str = "Điểm tối đa phải là số dương";
pub const NEGATIVE_POINTS: &str = "Điểm thành phần và điểm trừ không được âm";
pub const EMPTY_PROMPT: &str = "Nội dung câu hỏi không được để trống";

pub const MIN_TWO_OPTIONS: &str = "Phải có ít nhất 2 lựa chọn";
pub const MIN_TWO_IMAGES: &str = "Phải có ít nhất 2 hình ảnh";
pub const NO_CORRECT_ANSWER: &str = "Phải có ít nhất 1 đáp án đúng";
pub const MULTIPLE_CORRECT_ANSWERS: &str = "Chỉ được chọn 1 đáp án đúng";

pub const EMPTY_ANSWER: &str = "Đáp án không được để trống";
pub const MIN_TWO_ANSWERS: &str = "Phải có ít nhất 2 đáp án";

pub const MIN_TWO_ROWS: &str = "Phải có ít nhất 2 số hạng";
pub const MISSING_OPERATOR: &str = "Chưa chọn phép tính";
pub const RESULT_NOT_NUMERIC: &str = "Kết quả phải là số";
pub const DIVISION_BY_ZERO: &str = "Không thể chia cho 0";

pub const OPERAND1_NOT_NUMERIC: &str = "Số thứ nhất phải là số";
pub const OPERAND2_NOT_NUMERIC: &str = "Số thứ hai phải là số";

pub const EXACTLY_TWO_COLUMNS: &str = "Phải có đúng 2 cột";
pub const MIN_ONE_PAIR: &str = "Phải có ít nhất 1 cặp nối";

pub fn unknown_kind(kind: &str) -> String {
    format!("Loại câu hỏi không hợp lệ: {}", kind)
}

pub fn invalid_detail(reason: impl std::fmt::Display) -> String {
    format!("Dữ liệu chi tiết không hợp lệ: {}", reason)
}

pub fn media_missing_url(index: usize) -> String {
    format!("Media thứ {} chưa có đường dẫn", index + 1)
}

pub fn option_missing_id(index: usize) -> String {
    format!("Lựa chọn thứ {} thiếu mã", index + 1)
}

pub fn duplicate_id(id: &str) -> String {
    format!("Mã bị trùng: {}", id)
}

pub fn option_empty_text(id: &str) -> String {
    format!("Lựa chọn {} chưa có nội dung", id)
}

pub fn option_missing_image(id: &str) -> String {
    format!("Lựa chọn {} chưa có hình ảnh", id)
}

pub fn blank_answer_empty(id: &str) -> String {
    format!("Đáp án {} không được để trống", id)
}

pub fn row_not_numeric(index: usize) -> String {
    format!("Số hạng thứ {} phải là số", index + 1)
}

pub fn operator_count_mismatch(expected: usize, actual: usize) -> String {
    format!(
        "Chế độ hỗn hợp cần {} phép tính (hiện có {})",
        expected, actual
    )
}

pub fn column_min_items(index: usize) -> String {
    format!("Cột {} phải có ít nhất 2 mục", index + 1)
}

pub fn item_empty(column: usize, id: &str) -> String {
    format!("Mục {} ở cột {} chưa có nội dung", id, column + 1)
}
