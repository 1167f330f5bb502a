// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::history::ConversationHistory;

/// Fixed persona and formatting directives for the grape assistant.
/// Users and labels are Indonesian, so the persona is too; the model replies
/// in the language of its instructions.
pub const PERSONA_INSTRUCTION: &str = "Anda adalah GrapeCheck Bot, seorang ahli botani digital yang ramah dan berspesialisasi dalam kesehatan tanaman anggur. \
Tugas Anda adalah membantu pengguna mengidentifikasi penyakit, memberikan saran perawatan, dan menjawab pertanyaan terkait budidaya anggur berdasarkan riwayat percakapan. \
Selalu berikan jawaban yang **akurat, ringkas, dan mudah dipahami**. \
Ketika memberikan saran, **selalu gunakan format Markdown** seperti **poin-poin bernomor** atau **bullet points** untuk langkah-langkah yang jelas. \
Jika Anda tidak yakin atau pertanyaannya di luar topik anggur, katakan dengan sopan bahwa Anda hanya bisa membantu seputar tanaman anggur. \
Selalu sapa pengguna dengan ramah.";

/// Section header preceding the rendered transcript
pub const HISTORY_HEADER: &str = "Riwayat Percakapan:";

/// Label preceding the quoted prompt
pub const QUESTION_HEADER: &str = "Pertanyaan Pengguna Saat Ini:";

/// Build the single instruction string sent to the generation API
///
/// The transcript is rendered oldest first; an empty history still
/// produces the section header so the model sees a consistent layout.
pub fn build_instruction(history: &ConversationHistory, prompt: &str) -> String {
    let instruction = format!(
        "{}\n\n{}\n{}\n\n{} \"{}\"",
        PERSONA_INSTRUCTION,
        HISTORY_HEADER,
        history.transcript(),
        QUESTION_HEADER,
        prompt
    );

    tracing::debug!(
        "🎨 Built chat instruction (history: {} entries, {} chars)",
        history.len(),
        instruction.len()
    );

    instruction
}

/// Rough token estimate for logs
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}
